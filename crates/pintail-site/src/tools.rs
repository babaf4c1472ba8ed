//! Stock stylesheets and JavaScript.
//!
//! The tools step checks out and builds yelp-xsl into the tools directory
//! and writes the shared `pintail-html.xsl`. The JavaScript step generates
//! `yelp.js` from the cache and copies the scripts yelp-xsl ships.

use std::path::Path;

use pintail_xml::ns;

use crate::paths::{copy_file, make_dirs, path_string, write_file};
use crate::process::ExternalCommand;
use crate::transform::XslParams;
use crate::xslt::WrapperStylesheet;
use crate::{Site, SiteError};

/// Default yelp-xsl repository.
pub const YELP_XSL_REPOSITORY: &str = "https://gitlab.gnome.org/GNOME/yelp-xsl.git";

/// Shared customizations included by every generated HTML stylesheet.
const PINTAIL_HTML_XSL: &str = include_str!("../data/pintail-html.xsl");

const SYNTAX_SCRIPTS: [&str; 3] = [
    "jquery.syntax.js",
    "jquery.syntax.core.js",
    "jquery.syntax.layout.yelp.js",
];

impl Site {
    /// Repository to clone yelp-xsl from (`yelp_xsl_repository`).
    pub fn yelp_xsl_repository(&self) -> String {
        self.config()
            .get("yelp_xsl_repository", None)
            .unwrap_or_else(|| YELP_XSL_REPOSITORY.to_owned())
    }

    /// Fetch and build yelp-xsl, write `pintail-html.xsl`, then run every
    /// tools provider.
    ///
    /// Failures of git or the yelp-xsl build scripts are warnings.
    ///
    /// # Errors
    ///
    /// Returns error if a tool can't be started or a file can't be written.
    pub fn build_tools(&self) -> Result<(), SiteError> {
        let tools = self.paths().tools();
        make_dirs(&tools)?;

        let branch = self.yelp_xsl_branch();
        let repository = self.yelp_xsl_repository();
        let yelp = self.yelp_xsl_path();
        let label = format!("{repository}@{branch}");

        if yelp.exists() {
            if self.options().update {
                self.log("UPDATE", &label);
                self.run_command(
                    &ExternalCommand::new("git")
                        .args(["pull", "-q", "-r", "origin", branch.as_str()])
                        .cwd(&yelp),
                )?;
            }
        } else {
            self.log("CLONE", &label);
            let dirname = yelp
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.run_command(
                &ExternalCommand::new("git")
                    .args(["clone", "-q", "-b", branch.as_str(), "--single-branch"])
                    .arg(repository.as_str())
                    .arg(dirname)
                    .cwd(&tools),
            )?;
        }

        self.log("BUILD", &label);
        let localbuild = yelp.join("localbuild.sh");
        if localbuild.exists() {
            self.run_command(&ExternalCommand::new(path_string(&localbuild)).cwd(&yelp).quiet())?;
        } else {
            let autogen = yelp.join("autogen.sh");
            self.run_command(&ExternalCommand::new(path_string(&autogen)).cwd(&yelp).quiet())?;
            self.run_command(&ExternalCommand::new("make").cwd(&yelp).quiet())?;
        }

        write_file(&tools.join("pintail-html.xsl"), PINTAIL_HTML_XSL)?;

        for provider in self.registry().tools_providers() {
            provider.build_tools(self)?;
        }
        Ok(())
    }

    /// Generate `yelp.js` and copy the stock scripts into the output root.
    ///
    /// # Errors
    ///
    /// Returns error if a generated stylesheet or script can't be written
    /// or copied.
    pub fn build_js(&self) -> Result<(), SiteError> {
        self.scan_site()?;
        let tools = self.paths().tools();
        let target = self.paths().target();
        let jspath = self.yelp_xsl_path().join("js");
        let xslpath = self.yelp_xsl_path().join("xslt");
        let cache = self.paths().cache(None);
        make_dirs(&tools)?;

        self.copy_script(&jspath, "jquery.js", &target)?;

        let jsxsl = tools.join("pintail-js.xsl");
        WrapperStylesheet::new()
            .namespace("exsl", ns::EXSL)
            .namespace("cache", ns::CACHE)
            .namespace("mal", ns::MALLARD)
            .extension_prefixes("exsl")
            .import(xslpath.join("mallard/html/mal2xhtml.xsl"))
            .import("pintail-html.xsl")
            .includes(&self.custom_xsl())
            .raw("<xsl:output method=\"text\"/>")
            .raw("<xsl:template match=\"/\">")
            .raw(" <xsl:call-template name=\"html.js.content\"/>")
            .raw("</xsl:template>")
            .write(&jsxsl)?;
        self.log("JS", "/yelp.js");
        self.transform(
            &jsxsl,
            &cache,
            Some(&target.join("yelp.js")),
            &XslParams::new(),
            false,
        )?;

        self.copy_script(&jspath, "highlight.pack.js", &target)?;

        if jspath.join("jquery.syntax.js").exists() {
            for script in SYNTAX_SCRIPTS {
                self.copy_script(&jspath, script, &target)?;
            }

            let brushxsl = tools.join("pintail-js-brushes.xsl");
            WrapperStylesheet::new()
                .namespace("mal", ns::MALLARD)
                .namespace("cache", ns::CACHE)
                .namespace("exsl", ns::EXSL)
                .namespace("html", ns::XHTML)
                .extension_prefixes("exsl")
                .import(xslpath.join("mallard/html/mal2xhtml.xsl"))
                .includes(&self.custom_xsl())
                .raw(BRUSHES_TEMPLATE)
                .write(&brushxsl)?;
            let stylesheet = self.stylesheet(&brushxsl)?;
            let output = self.run_command(
                &stylesheet
                    .command(&cache, None, &XslParams::new(), false)
                    .capture(),
            )?;
            for brush in output.stdout.split_whitespace() {
                self.copy_script(&jspath, brush, &target)?;
            }
        }
        Ok(())
    }

    fn copy_script(&self, jspath: &Path, name: &str, target: &Path) -> Result<(), SiteError> {
        let from = jspath.join(name);
        if !from.exists() {
            return Ok(());
        }
        self.log("JS", &format!("/{name}"));
        copy_file(&from, &target.join(name))
    }
}

/// Lists the syntax highlighting brush scripts used by code blocks.
const BRUSHES_TEMPLATE: &str = r#"<xsl:output method="text"/>
<xsl:template match="/">
<xsl:for-each select="/cache:cache/mal:page">
<xsl:for-each select="document(@cache:href)//mal:code[@mime]">
  <xsl:variable name="out">
   <xsl:call-template name="mal2html.pre"/>
  </xsl:variable>
  <xsl:variable name="class">
   <xsl:value-of select="exsl:node-set($out)/*/html:pre[last()]/@class"/>
  </xsl:variable>
  <xsl:if test="starts-with($class, 'contents syntax brush-')">
   <xsl:text>jquery.syntax.brush.</xsl:text>
   <xsl:value-of select="substring-after($class, 'contents syntax brush-')"/>
   <xsl:text>.js&#x000A;</xsl:text>
  </xsl:if>
</xsl:for-each>
</xsl:for-each>
</xsl:template>"#;
