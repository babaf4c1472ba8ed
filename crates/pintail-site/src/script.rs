//! Hook scripts.
//!
//! `before_script` runs before the configuration is final, `config_script`
//! prints extra configuration on stdout, and `after_script` runs once a
//! build command succeeds. Scripts are paths relative to the site
//! directory and see the build settings through `PINTAIL_*` variables.

use crate::paths::{make_dirs, path_string};
use crate::process::ExternalCommand;
use crate::{Site, SiteError};

impl Site {
    /// Environment passed to hook scripts.
    ///
    /// # Errors
    ///
    /// Returns error if the output directory can't be created.
    pub fn script_env(&self) -> Result<Vec<(String, String)>, SiteError> {
        let options = self.options();
        let mut env = vec![
            ("PINTAIL_ARGS".to_owned(), self.filter().entries().join(" ")),
            (
                "PINTAIL_COMMAND".to_owned(),
                options.command.map(|c| c.as_str()).unwrap_or_default().to_owned(),
            ),
        ];
        let flags = [
            ("PINTAIL_LOCAL", options.local),
            ("PINTAIL_NO_SEARCH", !options.search),
            ("PINTAIL_NO_TRANSLATION", !options.translation),
            ("PINTAIL_NO_UPDATE", !options.update),
        ];
        for (name, set) in flags {
            if set {
                env.push((name.to_owned(), "1".to_owned()));
            }
        }

        let target = self.paths().target();
        make_dirs(&target)?;
        env.push(("PINTAIL_OUTPUT".to_owned(), path_string(&target)));
        env.push(("PINTAIL_SITE_ROOT".to_owned(), self.config().get_site_root(None)));
        if options.verbose {
            env.push(("PINTAIL_VERBOSE".to_owned(), "1".to_owned()));
        }
        Ok(env)
    }

    /// Run `before_script`, then apply the output of `config_script` as
    /// overlay configuration.
    pub(crate) fn run_setup_scripts(&mut self) -> Result<(), SiteError> {
        if let Some(script) = self.config.get("before_script", None) {
            self.run_script("before_script", &script, false)?;
        }
        if let Some(script) = self.config.get("config_script", None) {
            let overlay = self.run_script("config_script", &script, true)?;
            self.config.apply_overlay(&overlay)?;
        }
        Ok(())
    }

    pub(crate) fn run_after_script(&self) -> Result<(), SiteError> {
        if let Some(script) = self.config().get("after_script", None) {
            self.run_script("after_script", &script, false)?;
        }
        Ok(())
    }

    /// Run a script, returning its stdout when `capture` is set.
    fn run_script(&self, key: &str, script: &str, capture: bool) -> Result<String, SiteError> {
        self.log("SCRIPT", script);
        let program = self.paths().topdir().join(script);
        let mut command = ExternalCommand::new(path_string(&program)).envs(self.script_env()?);
        if capture {
            command = command.capture();
        }
        let output = self.runner().run(&command)?;
        if !output.success {
            return Err(SiteError::Script {
                script: key.to_owned(),
                code: output.code.unwrap_or(-1),
            });
        }
        Ok(output.stdout)
    }
}
