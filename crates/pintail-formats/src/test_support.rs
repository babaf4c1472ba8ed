//! Helpers shared by the unit tests.

use std::path::Path;

use pintail_config::Config;
use pintail_site::{BuildOptions, CallLog, MockRunner, Registry, Site, copy_input_to_output, write_file};

use crate::register_formats;

pub fn write(root: &Path, rel: &str, content: &str) {
    write_file(&root.join(rel), content).unwrap();
}

/// A Mallard page with an id and a title.
pub fn page_xml(id: &str, title: &str) -> String {
    format!(r#"<page xmlns="http://projectmallard.org/1.0/" id="{id}"><title>{title}</title></page>"#)
}

pub fn mallard_site(topdir: &Path, config: &str, options: BuildOptions) -> Site {
    mallard_site_with_calls(topdir, config, options).0
}

/// Site with every format registered and a recording runner. `ducktype`
/// copies its input, so `.duck` fixtures hold Mallard XML.
pub fn mallard_site_with_calls(topdir: &Path, config: &str, options: BuildOptions) -> (Site, CallLog) {
    let mut registry = Registry::with_core();
    register_formats(&mut registry);
    let runner = MockRunner::new().with_handler("ducktype", copy_input_to_output);
    let calls = runner.calls();
    let site = Site::from_config(
        topdir,
        Config::parse(config).unwrap(),
        options,
        registry,
        Box::new(runner),
    )
    .unwrap();
    (site, calls)
}
