use std::rc::Rc;

use platform_host::{HostServices, HostStrategy};

use crate::{WebBusyIndicator, WebFramePort, WebSlotStore};

/// Builds the browser host bundle: `localStorage` slots, iframe frame port, body wait cursor.
pub fn build_host_services() -> HostServices {
    HostServices {
        slots: Rc::new(WebSlotStore),
        frames: Rc::new(WebFramePort),
        busy: Rc::new(WebBusyIndicator),
        host_strategy: HostStrategy::Browser,
    }
}
