//! Helpers shared by the per-format CSS builders.

use std::io::Write;
use std::path::Path;

use pintail_site::{Site, SiteError, WrapperStylesheet, XslParams, make_dirs};
use pintail_xml::ns;

/// Common yelp-xsl modules every CSS stylesheet imports.
const COMMON_XSL: [&str; 5] = ["l10n", "color", "icons", "html", "tmpl"];

/// Locale selection shared by the CSS templates, from `xml:lang`, `lang`,
/// or `C`.
pub(crate) const LOCALE_VARIABLE: &str = r#"<xsl:variable name="locale">
 <xsl:choose>
  <xsl:when test="@xml:lang"><xsl:value-of select="@xml:lang"/></xsl:when>
  <xsl:when test="@lang"><xsl:value-of select="@lang"/></xsl:when>
  <xsl:otherwise><xsl:text>C</xsl:text></xsl:otherwise>
 </xsl:choose>
</xsl:variable>"#;

/// Wrapper stylesheet importing the yelp-xsl common modules, then `page_xsl`
/// (relative to the yelp-xsl `xslt` directory), `pintail-html.xsl`, and
/// the site's custom XSLT.
pub(crate) fn css_stylesheet(site: &Site, page_xsl: &str) -> WrapperStylesheet {
    let xslpath = site.yelp_xsl_path().join("xslt");
    let wrapper = WrapperStylesheet::new()
        .namespace("exsl", ns::EXSL)
        .extension_prefixes("exsl");
    COMMON_XSL
        .iter()
        .fold(wrapper, |w, name| w.import(xslpath.join(format!("common/{name}.xsl"))))
        .import(xslpath.join(page_xsl))
        .import("pintail-html.xsl")
        .includes(&site.custom_xsl())
}

/// Generate `target/<file>` by applying `stylesheet` to `input`, then append
/// the site's `custom_css`.
pub(crate) fn write_css(
    site: &Site,
    stylesheet: &Path,
    input: &Path,
    file: &str,
    mut params: XslParams,
) -> Result<(), SiteError> {
    let target = site.paths().target();
    make_dirs(&target)?;
    let csspath = target.join(file);
    site.log("CSS", &format!("/{file}"));
    params.push("out", csspath.to_string_lossy());
    site.transform(stylesheet, input, Some(&target), &params, false)?;
    append_custom_css(site, &csspath)
}

fn append_custom_css(site: &Site, csspath: &Path) -> Result<(), SiteError> {
    let Some(custom) = site.config().get_expanded("custom_css", None)? else {
        return Ok(());
    };
    let custom = site.paths().topdir().join(custom);
    let content = std::fs::read_to_string(&custom).map_err(SiteError::io(&custom))?;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(csspath)
        .map_err(SiteError::io(csspath))?;
    file.write_all(content.as_bytes())
        .map_err(SiteError::io(csspath))
}
