//! Translation backend contract.

use crate::directory::Directory;
use crate::page::Page;
use crate::source::Source;
use crate::Site;

/// A translation backend.
///
/// Translated documents are written to the language's stage tree
/// (`__pintail__/stage-<lang>/`). A `false` return means no translation is
/// available and the source-language file is used.
pub trait TranslationProvider {
    /// Language the site is written in.
    fn source_lang(&self, site: &Site) -> String {
        site.config()
            .get("source_lang", None)
            .unwrap_or_else(|| "en".to_owned())
    }

    /// Languages a directory is translated into.
    fn directory_langs(&self, site: &Site, directory: &Directory) -> Vec<String>;

    /// Languages used anywhere on the site, in first-seen order.
    fn site_langs(&self, site: &Site) -> Vec<String> {
        let mut langs: Vec<String> = Vec::new();
        if let Some(tree) = site.tree() {
            for directory in tree.iter_directories() {
                for lang in self.directory_langs(site, directory) {
                    if !langs.contains(&lang) {
                        langs.push(lang);
                    }
                }
            }
        }
        langs
    }

    /// Prepare a directory's translations after the scan.
    fn translate_directory(&self, _site: &Site, _directory: &Directory, _lang: &str) -> bool {
        false
    }

    /// Produce the translated stage file of `page`.
    fn translate_page(&self, _site: &Site, _page: &dyn Page, _lang: &str) -> bool {
        false
    }

    /// Produce the translated stage copy of a media file.
    fn translate_media(&self, _site: &Site, _source: &Source, _file: &str, _lang: &str) -> bool {
        false
    }
}
