//! The environment an application runs in.
//!
//! [`Host`] abstracts the page: the location hash, the container views are
//! rendered into, scrolling, image warming and the inline template blocks
//! embedded in the page. A browser binding implements it on top of the DOM;
//! [`MemoryHost`] keeps everything in memory and records what the router did,
//! which is what the tests drive.

/// Capabilities the router needs from the page.
pub trait Host {
    /// Current location hash, including the leading `#`. Empty when the URL
    /// has no fragment.
    fn location_hash(&self) -> String;

    /// Replace the location hash.
    fn set_location_hash(&mut self, hash: &str);

    /// Navigate the whole page to another URL.
    fn assign_url(&mut self, url: &str);

    /// Return `true` if the render container exists.
    fn has_container(&self) -> bool;

    /// Replace the container's content with `html`.
    fn render_into_container(&mut self, html: &str);

    /// Scroll the page to its top.
    fn scroll_to_top(&mut self) {}

    /// Start loading an image off-screen so it is cached when shown.
    fn preload_image(&mut self, _src: &str) {}

    /// Return `true` if the page notifies hash changes. When it does not, the
    /// router falls back to polling.
    fn supports_hash_change(&self) -> bool {
        true
    }

    /// Inline template blocks as `(id, markup)` pairs.
    fn inline_templates(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

/// In-memory [`Host`] that records every side effect.
///
/// ```
/// use spa_navigator::{Host, MemoryHost};
///
/// let mut host = MemoryHost::new().with_hash("#!/about");
/// host.render_into_container("<p>about</p>");
///
/// assert_eq!(host.location_hash(), "#!/about");
/// assert_eq!(host.container(), "<p>about</p>");
/// assert_eq!(host.render_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryHost {
    hash: String,
    has_container: bool,
    hash_change: bool,
    templates: Vec<(String, String)>,
    container: String,
    renders: Vec<String>,
    assigned_urls: Vec<String>,
    scrolls: usize,
    preloaded_images: Vec<String>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self {
            hash: String::new(),
            has_container: true,
            hash_change: true,
            templates: Vec::new(),
            container: String::new(),
            renders: Vec::new(),
            assigned_urls: Vec::new(),
            scrolls: 0,
            preloaded_images: Vec::new(),
        }
    }
}

impl MemoryHost {
    /// Host with a container, an empty hash and hash-change support.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at the given hash.
    #[must_use]
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = hash.into();
        self
    }

    /// Simulate a page without a render container.
    #[must_use]
    pub fn without_container(mut self) -> Self {
        self.has_container = false;
        self
    }

    /// Simulate a page that does not report hash changes.
    #[must_use]
    pub fn without_hash_change(mut self) -> Self {
        self.hash_change = false;
        self
    }

    /// Embed an inline template block.
    #[must_use]
    pub fn with_inline_template(mut self, id: impl Into<String>, markup: impl Into<String>) -> Self {
        self.templates.push((id.into(), markup.into()));
        self
    }

    /// Current container content.
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Every markup written into the container, oldest first.
    pub fn renders(&self) -> &[String] {
        &self.renders
    }

    /// Number of container writes.
    pub fn render_count(&self) -> usize {
        self.renders.len()
    }

    /// URLs the page was sent to.
    pub fn assigned_urls(&self) -> &[String] {
        &self.assigned_urls
    }

    /// Number of scroll-to-top requests.
    pub fn scroll_count(&self) -> usize {
        self.scrolls
    }

    /// Image URLs handed over for warming.
    pub fn preloaded_images(&self) -> &[String] {
        &self.preloaded_images
    }
}

impl Host for MemoryHost {
    fn location_hash(&self) -> String {
        self.hash.clone()
    }

    fn set_location_hash(&mut self, hash: &str) {
        self.hash = hash.to_string();
    }

    fn assign_url(&mut self, url: &str) {
        self.assigned_urls.push(url.to_string());
    }

    fn has_container(&self) -> bool {
        self.has_container
    }

    fn render_into_container(&mut self, html: &str) {
        self.container = html.to_string();
        self.renders.push(html.to_string());
    }

    fn scroll_to_top(&mut self) {
        self.scrolls += 1;
    }

    fn preload_image(&mut self, src: &str) {
        self.preloaded_images.push(src.to_string());
    }

    fn supports_hash_change(&self) -> bool {
        self.hash_change
    }

    fn inline_templates(&self) -> Vec<(String, String)> {
        self.templates.clone()
    }
}
