//! Output transform seam.
//!
//! Stylesheets are applied with `xsltproc`. Parameters are passed as
//! `--stringparam` pairs in the order they were collected.

use std::path::{Path, PathBuf};

use crate::process::ExternalCommand;
use crate::SiteError;

/// Ordered stylesheet parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XslParams(Vec<(String, String)>);

impl XslParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Insert a parameter before all others.
    pub fn prepend(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(0, (name.into(), value.into()));
    }

    /// First value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names in order.
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// `xsltproc` arguments: `--stringparam name value` per parameter.
    pub fn to_stringparam_args(&self) -> Vec<String> {
        self.0
            .iter()
            .flat_map(|(n, v)| ["--stringparam".to_owned(), n.clone(), v.clone()])
            .collect()
    }
}

impl Extend<(String, String)> for XslParams {
    fn extend<T: IntoIterator<Item = (String, String)>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

/// A stylesheet file known to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    path: PathBuf,
}

impl Stylesheet {
    /// Check that the stylesheet exists.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::MissingStylesheet`] if `path` isn't a file.
    pub fn load(path: &Path) -> Result<Self, SiteError> {
        if !path.is_file() {
            return Err(SiteError::MissingStylesheet(path.to_path_buf()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Command applying this stylesheet to `input`.
    ///
    /// Without an `output`, the transform's own standard output is
    /// discarded; stylesheets that write documents with `exsl:document`
    /// don't need one.
    pub fn command(
        &self,
        input: &Path,
        output: Option<&Path>,
        params: &XslParams,
        xinclude: bool,
    ) -> ExternalCommand {
        let mut command = ExternalCommand::new("xsltproc");
        if xinclude {
            command = command.arg("--xinclude");
        }
        command = command.args(params.to_stringparam_args());
        match output {
            Some(output) => command = command.arg("-o").path_arg(output),
            None => command = command.quiet(),
        }
        command.path_arg(&self.path).path_arg(input)
    }
}
