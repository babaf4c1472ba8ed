//! Document formats for Pintail.
//!
//! - Mallard pages, from `.page` files or compiled from Ducktype `.duck`
//! - DocBook documents, chunked into one page per structural division
//!
//! Call [`register_formats`] to plug all of them into a
//! [`Registry`](pintail_site::Registry).

mod css;
mod docbook;
mod ducktype;
mod lang;
mod mallard;
#[cfg(test)]
mod test_support;

use pintail_site::Registry;

pub use docbook::{DOCBOOK_FORMAT, DocBookDocument, DocBookDocuments, DocBookPage, DocBookPageProvider, DocBookTools};
pub use ducktype::DucktypePageProvider;
pub use mallard::{MALLARD_FORMAT, MallardPage, MallardPageProvider, MallardSyntax, MallardTools, StackTracker};

/// Register the page, tools, CSS, and XSLT providers of every format.
pub fn register_formats(registry: &mut Registry) {
    let stacks = StackTracker::default();
    let documents = DocBookDocuments::default();
    registry
        .add_page_provider(MallardPageProvider::new(stacks.clone()))
        .add_page_provider(DucktypePageProvider::new(stacks))
        .add_page_provider(DocBookPageProvider::new(documents.clone()))
        .add_tools_provider(MallardTools)
        .add_css_provider(MallardTools)
        .add_xsl_provider(MallardTools)
        .add_tools_provider(DocBookTools::new(documents.clone()))
        .add_css_provider(DocBookTools::new(documents));
}

/// Identifier used in build logs: the site id, prefixed by the language.
pub(crate) fn log_id(lang: Option<&str>, id: &str) -> String {
    match lang {
        Some(lang) => format!("{lang} {id}"),
        None => id.to_owned(),
    }
}
