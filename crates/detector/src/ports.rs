use tokio::sync::mpsc;

use consentlens_core_types::ElementId;

use crate::model::{Annotation, MutationBatch};
use crate::selectors::Selector;

/// Resolved style values as the rendering engine reports them: literal
/// strings, compared verbatim by the visibility check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComputedStyle {
    pub display: String,
    pub visibility: String,
    pub opacity: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: "block".into(),
            visibility: "visible".into(),
            opacity: "1".into(),
        }
    }
}

/// The injected document-query capability the scanner and watcher run
/// against. Implementations wrap a live document or an in-memory tree;
/// the pipeline never touches a rendering engine directly.
pub trait DomPort: Send + Sync {
    /// URL of the page the document belongs to.
    fn page_url(&self) -> String;

    /// All elements matching the selector, in document order.
    fn query(&self, selector: &Selector) -> Vec<ElementId>;

    fn tag_name(&self, el: ElementId) -> Option<String>;
    fn parent(&self, el: ElementId) -> Option<ElementId>;
    fn attribute(&self, el: ElementId, name: &str) -> Option<String>;
    fn classes(&self, el: ElementId) -> Vec<String>;

    /// Visible text of the element and its descendants.
    fn inner_text(&self, el: ElementId) -> Option<String>;

    fn computed_style(&self, el: ElementId) -> Option<ComputedStyle>;

    /// Descendants whose tag name is in `tags`, in document order.
    fn descendants(&self, el: ElementId, tags: &[&str]) -> Vec<ElementId>;

    /// Applies the cosmetic highlight/badge/tooltip to a matched element.
    fn annotate(&self, el: ElementId, annotation: &Annotation);

    /// Subscribes to subtree mutation batches under the document body.
    /// Batches arrive in observation order.
    fn subscribe_mutations(&self) -> mpsc::UnboundedReceiver<MutationBatch>;
}
