use std::fmt;

use serde::{Deserialize, Serialize};

use crate::surfaces::{front_surface, Surface, SurfaceKind};

pub const DEFAULT_WINDOW_X: i32 = 100;
pub const DEFAULT_WINDOW_Y: i32 = 100;
pub const DEFAULT_WINDOW_WIDTH: i32 = 800;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 600;
/// Height reserved for the taskbar strip at the bottom of the viewport.
pub const TASKBAR_HEIGHT_PX: i32 = 40;
pub const MIN_WINDOW_WIDTH: i32 = 300;
pub const MIN_WINDOW_HEIGHT: i32 = 200;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "win-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageBoxId(pub u64);

impl fmt::Display for MessageBoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msgbox-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Normalized application name; windows sharing it share one taskbar entry.
pub struct AppIdentity(String);

impl AppIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Builds the identity from a hyphenated app id: `this-pc` becomes `This Pc`.
    pub fn from_slug(slug: &str) -> Self {
        let words: Vec<String> = slug
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect();
        Self(words.join(" "))
    }

    /// Non-empty `id` wins over the display `name`.
    pub fn resolve(id: Option<&str>, name: &str) -> Self {
        match id {
            Some(id) if !id.is_empty() => Self::from_slug(id),
            _ => Self::new(name),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Icon asset used when the caller supplied none.
    pub fn default_icon_path(&self) -> String {
        format!(
            "StaticResources/Icons/{}.png",
            self.0.to_lowercase().replace(' ', "-")
        )
    }
}

impl fmt::Display for AppIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..self
        }
    }

    pub fn clamped_min(self, min_w: i32, min_h: i32) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }

    /// A `w`×`h` rect centred on `self`.
    pub fn centered(self, w: i32, h: i32) -> Self {
        Self {
            x: self.x.saturating_add(self.w.saturating_sub(w) / 2),
            y: self.y.saturating_add(self.h.saturating_sub(h) / 2),
            w,
            h,
        }
    }

    /// Moves `self` so it lies inside `bounds`; the top-left corner wins when it cannot fit.
    pub fn clamped_within(self, bounds: WindowRect) -> Self {
        let max_x = bounds.x.saturating_add(bounds.w.saturating_sub(self.w).max(0));
        let max_y = bounds.y.saturating_add(bounds.h.saturating_sub(self.h).max(0));
        Self {
            x: self.x.clamp(bounds.x, max_x),
            y: self.y.clamp(bounds.y, max_y),
            ..self
        }
    }
}

impl Default for WindowRect {
    fn default() -> Self {
        Self {
            x: DEFAULT_WINDOW_X,
            y: DEFAULT_WINDOW_Y,
            w: DEFAULT_WINDOW_WIDTH,
            h: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayState {
    #[default]
    Normal,
    /// Hidden; `restore_maximized` remembers whether un-minimizing returns to maximized.
    Minimized { restore_maximized: bool },
    Maximized,
}

impl DisplayState {
    pub fn is_minimized(self) -> bool {
        matches!(self, Self::Minimized { .. })
    }

    pub fn is_maximized(self) -> bool {
        matches!(self, Self::Maximized)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowContent {
    /// Embedded document loaded into the window's frame.
    Url(String),
    /// Inline markup rendered directly.
    Markup(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRecord {
    pub id: WindowId,
    pub app: AppIdentity,
    pub title: String,
    pub icon: String,
    pub content: WindowContent,
    pub rect: WindowRect,
    /// Last explicit non-maximized geometry.
    pub restore_rect: WindowRect,
    pub display: DisplayState,
    pub z_order: u32,
    pub loading: bool,
    pub revealed: bool,
}

impl WindowRecord {
    pub fn surface(&self) -> Surface {
        Surface {
            kind: SurfaceKind::Window,
            geometry: self.rect,
            display: self.display,
            z_order: self.z_order,
        }
    }

    /// Shown on screen: revealed after load and not minimized.
    pub fn is_visible(&self) -> bool {
        self.revealed && !self.display.is_minimized()
    }

    pub fn url(&self) -> Option<&str> {
        match &self.content {
            WindowContent::Url(url) => Some(url),
            WindowContent::Markup(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopState {
    pub next_window_id: u64,
    pub windows: Vec<WindowRecord>,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            next_window_id: 1,
            windows: Vec::new(),
        }
    }
}

impl DesktopState {
    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    pub fn windows_for<'a>(
        &'a self,
        app: &'a AppIdentity,
    ) -> impl Iterator<Item = &'a WindowRecord> + 'a {
        self.windows.iter().filter(move |w| &w.app == app)
    }

    /// Visible window with the greatest z-order.
    pub fn front_window(&self) -> Option<&WindowRecord> {
        let front = front_surface(
            self.windows
                .iter()
                .filter(|w| w.revealed)
                .map(WindowRecord::surface),
        )?;
        self.windows.iter().find(|w| w.z_order == front.z_order)
    }

    pub fn any_loading(&self) -> bool {
        self.windows.iter().any(|w| w.loading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Request to open (or refocus) an application window.
pub struct OpenAppRequest {
    /// Display name, used as the identity when `id` is empty.
    pub name: String,
    pub url: Option<String>,
    /// Hyphenated app id, normalized into the identity.
    pub id: Option<String>,
    pub icon: Option<String>,
    /// Inline content for windows without a URL.
    pub markup: Option<String>,
    /// Geometry override; defaults to 800×600 at (100,100).
    pub rect: Option<WindowRect>,
}

impl OpenAppRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = Some(markup.into());
        self
    }

    pub fn with_rect(mut self, rect: WindowRect) -> Self {
        self.rect = Some(rect);
        self
    }

    pub fn identity(&self) -> AppIdentity {
        AppIdentity::resolve(self.id.as_deref(), &self.name)
    }

    pub fn content(&self) -> WindowContent {
        match (&self.url, &self.markup) {
            (Some(url), _) if !url.is_empty() => WindowContent::Url(url.clone()),
            (_, markup) => WindowContent::Markup(markup.clone().unwrap_or_default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Metadata carried by a desktop icon element.
pub struct DesktopIcon {
    /// Caption text under the icon.
    pub label: String,
    /// `data-name`: hyphenated app id.
    pub name: Option<String>,
    /// `data-appurl`.
    pub app_url: Option<String>,
    /// `data-icon`, preferred over the image source.
    pub icon: Option<String>,
    /// `src` of the icon image.
    pub image_src: Option<String>,
}

impl From<&DesktopIcon> for OpenAppRequest {
    fn from(icon: &DesktopIcon) -> Self {
        Self {
            name: icon.label.clone(),
            url: icon.app_url.clone(),
            id: icon.name.clone(),
            icon: icon
                .icon
                .clone()
                .filter(|i| !i.is_empty())
                .or_else(|| icon.image_src.clone()),
            markup: None,
            rect: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Fully resolved input of window creation.
pub struct CreateWindowSpec {
    pub app: AppIdentity,
    pub title: String,
    pub icon: String,
    pub content: WindowContent,
    pub rect: WindowRect,
}

impl CreateWindowSpec {
    pub fn from_request(request: &OpenAppRequest) -> Self {
        let app = request.identity();
        let icon = request
            .icon
            .clone()
            .filter(|i| !i.is_empty())
            .unwrap_or_else(|| app.default_icon_path());
        Self {
            title: app.to_string(),
            icon,
            content: request.content(),
            rect: request.rect.unwrap_or_default(),
            app,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub edge: ResizeEdge,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub dragging: Option<DragSession>,
    pub resizing: Option<ResizeSession>,
}

/// Geometry of a window a dialog is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentWindow {
    pub window_id: WindowId,
    pub rect: WindowRect,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn slug_identity_capitalizes_each_word() {
        assert_eq!(AppIdentity::from_slug("this-pc").as_str(), "This Pc");
        assert_eq!(AppIdentity::from_slug("notepad").as_str(), "Notepad");
        assert_eq!(
            AppIdentity::resolve(Some(""), "Recycle Bin").as_str(),
            "Recycle Bin"
        );
    }

    #[test]
    fn desktop_icon_prefers_data_icon_over_image() {
        let icon = DesktopIcon {
            label: "My Notes".to_string(),
            name: Some("notepad".to_string()),
            app_url: Some("Apps/Notepad/index.html".to_string()),
            icon: None,
            image_src: Some("StaticResources/Icons/notepad.png".to_string()),
        };
        let request = OpenAppRequest::from(&icon);
        assert_eq!(request.identity().as_str(), "Notepad");
        assert_eq!(
            request.icon.as_deref(),
            Some("StaticResources/Icons/notepad.png")
        );

        let with_data_icon = DesktopIcon {
            icon: Some("custom.png".to_string()),
            ..icon
        };
        assert_eq!(
            OpenAppRequest::from(&with_data_icon).icon.as_deref(),
            Some("custom.png")
        );
    }

    #[test]
    fn create_spec_defaults_geometry_and_icon() {
        let spec = CreateWindowSpec::from_request(&OpenAppRequest::new("This Pc"));
        assert_eq!(spec.rect, WindowRect::default());
        assert_eq!(spec.icon, "StaticResources/Icons/this-pc.png");
        assert_eq!(spec.content, WindowContent::Markup(String::new()));
    }

    #[test]
    fn clamping_keeps_rect_inside_bounds() {
        let bounds = WindowRect {
            x: 0,
            y: 0,
            w: 1000,
            h: 700,
        };
        let rect = WindowRect {
            x: 900,
            y: -30,
            w: 300,
            h: 200,
        };
        assert_eq!(
            rect.clamped_within(bounds),
            WindowRect {
                x: 700,
                y: 0,
                w: 300,
                h: 200
            }
        );
        assert_eq!(
            bounds.centered(400, 300),
            WindowRect {
                x: 300,
                y: 200,
                w: 400,
                h: 300
            }
        );
    }

    #[test]
    fn geometry_saturates_at_extreme_coordinates() {
        let far = WindowRect {
            x: i32::MAX - 5,
            y: i32::MIN + 5,
            w: 400,
            h: 300,
        };
        let moved = far.offset(10, -10);
        assert_eq!((moved.x, moved.y), (i32::MAX, i32::MIN));

        let centred = far.centered(i32::MIN, 10);
        assert_eq!(centred.x, i32::MAX);
    }
}
