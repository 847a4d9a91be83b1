//! Built-in template catalog.
//!
//! The catalog is constructed once at startup and never mutated. Each
//! entry tunes the engine for a class of book: reflowed text, image-heavy
//! children's books, technical layouts, small phone screens.

use once_cell::sync::Lazy;

use super::types::{EngineOption, Template, TemplateInfo};

const MOBILE_CSS: &str = "html { height: 100% !important; } body { font-size: 1.3em !important; line-height: 1.7 !important; margin: 0 !important; padding: 0.5em !important; height: 100vh !important; max-width: 100vw !important; box-sizing: border-box !important; } p { margin: 0.6em 0 !important; text-align: justify !important; } img { max-width: 100% !important; width: 100% !important; height: auto !important; display: block !important; margin: 1em auto !important; page-break-inside: avoid !important; } @media (max-width: 430px) { body { font-size: 1.4em !important; padding: 0.3em !important; } } @media (min-width: 431px) and (max-width: 768px) { body { font-size: 1.3em !important; padding: 0.4em !important; } }";

const TABLET_CSS: &str = "body { font-size: 1.1em !important; max-width: 100% !important; } p { text-align: justify !important; margin: 0.8em 0 !important; } img { max-width: 100% !important; width: 100% !important; height: auto !important; page-break-inside: avoid !important; } @media (max-width: 600px) { body { font-size: 1.3em !important; } }";

const MAGAZINE_CSS: &str = "body { font-size: 1.1em !important; } img { max-width: 100% !important; width: 100% !important; height: auto !important; display: block !important; margin: 1em auto !important; page-break-inside: avoid !important; } p { text-align: justify !important; margin: 0.6em 0 !important; } @media (max-width: 768px) { body { font-size: 1.4em !important; padding: 0.5em !important; } img { margin: 0.5em 0 !important; } }";

const FULLSCREEN_CSS: &str = "html { height: 100% !important; overflow-x: hidden !important; } body { font-size: 1.4em !important; padding: 0 !important; margin: 0 !important; max-width: 100vw !important; height: 100vh !important; line-height: 1.8 !important; box-sizing: border-box !important; display: flex !important; flex-direction: column !important; justify-content: center !important; } p { text-align: center !important; margin: 0.8em 0.5em !important; padding: 0 0.5em !important; } img { max-width: 100% !important; width: 100% !important; height: auto !important; display: block !important; margin: 1em auto !important; border-radius: 8px !important; box-shadow: 0 4px 8px rgba(0,0,0,0.1) !important; page-break-inside: avoid !important; } h1, h2, h3 { text-align: center !important; margin: 1em 0.5em !important; } @media (max-width: 430px) { body { font-size: 1.5em !important; } } @media (orientation: landscape) { body { flex-direction: row !important; justify-content: space-around !important; } }";

const IPHONE_CSS: &str = r#"@page { margin: 0 !important; } html { margin: 0 !important; padding: 0 !important; background: #39454F !important; height: 100% !important; } body { font-family: -apple-system, BlinkMacSystemFont, "SF Pro Text", "Helvetica Neue", Helvetica, Arial, sans-serif !important; font-size: 1.2em !important; line-height: 1.6 !important; color: #ffffff !important; background: #39454F !important; margin: 0 !important; padding: 0 !important; text-align: center !important; width: 100% !important; height: 100vh !important; box-sizing: border-box !important; -webkit-font-smoothing: antialiased !important; display: flex !important; flex-direction: column !important; justify-content: center !important; align-items: center !important; } svg { display: block !important; margin: 0 auto !important; max-width: 100% !important; width: auto !important; max-height: 95vh !important; height: auto !important; object-fit: contain !important; border-radius: 12px !important; box-shadow: 0 8px 32px rgba(0,0,0,0.3) !important; page-break-before: always !important; page-break-after: always !important; page-break-inside: avoid !important; position: absolute !important; top: 50% !important; left: 50% !important; transform: translate(-50%, -50%) !important; } svg image { max-width: 100% !important; max-height: 95vh !important; width: auto !important; height: auto !important; object-fit: contain !important; border-radius: 12px !important; } .content, div, section, article, main { width: 100% !important; max-width: 100% !important; margin: 0 !important; padding: 0 !important; display: flex !important; flex-direction: column !important; justify-content: center !important; align-items: center !important; height: 100% !important; } h1, h2, h3, h4, h5, h6 { font-family: -apple-system, BlinkMacSystemFont, "SF Pro Display", "Helvetica Neue", Helvetica, Arial, sans-serif !important; font-weight: 600 !important; color: #ffffff !important; text-align: center !important; margin: 20px 10px !important; page-break-before: auto !important; page-break-after: avoid !important; } h1 { font-size: 2em !important; font-weight: 700 !important; page-break-before: always !important; } h2 { font-size: 1.6em !important; } h3 { font-size: 1.3em !important; } p { text-align: center !important; margin: 10px 20px !important; color: #ffffff !important; hyphens: auto !important; -webkit-hyphens: auto !important; text-indent: 0 !important; page-break-inside: avoid !important; } img { display: block !important; margin: 0 auto !important; max-width: 100% !important; width: auto !important; max-height: 95vh !important; height: auto !important; object-fit: contain !important; border-radius: 12px !important; box-shadow: 0 8px 32px rgba(0,0,0,0.3) !important; page-break-before: always !important; page-break-after: always !important; page-break-inside: avoid !important; position: absolute !important; top: 50% !important; left: 50% !important; transform: translate(-50%, -50%) !important; } .calibre_3, .calibre_4, .calibre_5, .calibre_6, .calibre_7, .calibre_8 { display: flex !important; justify-content: center !important; align-items: center !important; height: 100vh !important; width: 100% !important; position: relative !important; } blockquote { font-style: italic !important; margin: 20px 0 !important; padding: 20px 25px !important; border-left: 4px solid #007aff !important; background: #2c353d !important; color: #ffffff !important; border-radius: 8px !important; page-break-inside: avoid !important; }"#;

fn template(key: &str, name: &str, description: &str, options: &[(&str, &str)]) -> Template {
    Template {
        key: key.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        options: options
            .iter()
            .map(|(flag, value)| EngineOption::new(*flag, *value))
            .collect(),
    }
}

static CATALOG: Lazy<Vec<Template>> = Lazy::new(|| {
    vec![
        template(
            "default",
            "Standard",
            "Balanced settings for most books",
            &[
                ("--output-profile", "generic_eink"),
                ("--epub-version", "3"),
                ("--embed-all-fonts", ""),
                ("--disable-font-rescaling", ""),
                ("--minimum-line-height", "130"),
                ("--margin-left", "5"),
                ("--margin-right", "5"),
                ("--margin-top", "5"),
                ("--margin-bottom", "5"),
            ],
        ),
        template(
            "mobile",
            "Mobile Optimized",
            "Phone screens - large text, tight pagination",
            &[
                ("--output-profile", "tablet"),
                ("--epub-version", "3"),
                ("--preserve-cover-aspect-ratio", ""),
                ("--embed-all-fonts", ""),
                ("--disable-font-rescaling", ""),
                ("--minimum-line-height", "160"),
                ("--margin-left", "0"),
                ("--margin-right", "0"),
                ("--margin-top", "0"),
                ("--margin-bottom", "0"),
                ("--max-toc-links", "0"),
                ("--chapter", "detect-none"),
                ("--no-chapters", ""),
                ("--expand-css", ""),
                ("--extra-css", MOBILE_CSS),
            ],
        ),
        template(
            "tablet",
            "Tablet/iPad Optimized",
            "Fluid layout with large images",
            &[
                ("--output-profile", "ipad3"),
                ("--epub-version", "3"),
                ("--preserve-cover-aspect-ratio", ""),
                ("--embed-all-fonts", ""),
                ("--disable-font-rescaling", ""),
                ("--minimum-line-height", "150"),
                ("--margin-left", "5"),
                ("--margin-right", "5"),
                ("--margin-top", "5"),
                ("--margin-bottom", "5"),
                ("--max-toc-links", "0"),
                ("--chapter", "detect-none"),
                ("--no-chapters", ""),
                ("--expand-css", ""),
                ("--extra-css", TABLET_CSS),
            ],
        ),
        template(
            "children",
            "Children's Books",
            "Large images and simple text",
            &[
                ("--output-profile", "ipad3"),
                ("--epub-version", "3"),
                ("--preserve-cover-aspect-ratio", ""),
                ("--embed-all-fonts", ""),
                ("--disable-font-rescaling", ""),
                ("--minimum-line-height", "150"),
                ("--margin-left", "10"),
                ("--margin-right", "10"),
                ("--margin-top", "10"),
                ("--margin-bottom", "10"),
                ("--max-toc-links", "0"),
                ("--chapter", "detect-none"),
                ("--no-chapters", ""),
                ("--expand-css", ""),
            ],
        ),
        template(
            "novel",
            "Novel/Fiction",
            "Long-form reading with chapter detection",
            &[
                ("--output-profile", "kindle"),
                ("--epub-version", "3"),
                ("--smarten-punctuation", ""),
                ("--chapter", "//h:h1 | //h:h2"),
                ("--page-breaks-before", "//h:h1"),
                ("--margin-left", "5"),
                ("--margin-right", "5"),
                ("--margin-top", "5"),
                ("--margin-bottom", "5"),
                ("--minimum-line-height", "120"),
                ("--embed-all-fonts", ""),
                ("--disable-font-rescaling", ""),
            ],
        ),
        template(
            "technical",
            "Technical Books",
            "Preserves complex formatting and tables",
            &[
                ("--output-profile", "generic_eink"),
                ("--epub-version", "3"),
                ("--preserve-cover-aspect-ratio", ""),
                ("--embed-all-fonts", ""),
                ("--expand-css", ""),
                ("--margin-left", "8"),
                ("--margin-right", "8"),
                ("--margin-top", "8"),
                ("--margin-bottom", "8"),
                ("--minimum-line-height", "130"),
                ("--chapter", "//h:h1 | //h:h2 | //h:h3"),
                ("--page-breaks-before", "//h:h1"),
            ],
        ),
        template(
            "magazine",
            "Magazine/Images",
            "Image-heavy books, mobile friendly",
            &[
                ("--output-profile", "tablet"),
                ("--epub-version", "3"),
                ("--preserve-cover-aspect-ratio", ""),
                ("--embed-all-fonts", ""),
                ("--minimum-line-height", "140"),
                ("--margin-left", "2"),
                ("--margin-right", "2"),
                ("--margin-top", "2"),
                ("--margin-bottom", "2"),
                ("--expand-css", ""),
                ("--extra-css", MAGAZINE_CSS),
            ],
        ),
        template(
            "fullscreen",
            "Full Screen Mobile",
            "Edge-to-edge phone layout, no margins",
            &[
                ("--output-profile", "tablet"),
                ("--epub-version", "3"),
                ("--preserve-cover-aspect-ratio", ""),
                ("--embed-all-fonts", ""),
                ("--disable-font-rescaling", ""),
                ("--minimum-line-height", "155"),
                ("--margin-left", "0"),
                ("--margin-right", "0"),
                ("--margin-top", "0"),
                ("--margin-bottom", "0"),
                ("--max-toc-links", "0"),
                ("--expand-css", ""),
                ("--extra-css", FULLSCREEN_CSS),
            ],
        ),
        template(
            "iphone15",
            "iPhone 15 Pro Max - Apple Books",
            "Clean Apple Books style - centered content",
            &[
                ("--output-profile", "tablet"),
                ("--epub-version", "3"),
                ("--preserve-cover-aspect-ratio", ""),
                ("--embed-all-fonts", ""),
                ("--disable-font-rescaling", ""),
                ("--minimum-line-height", "160"),
                ("--margin-left", "0"),
                ("--margin-right", "0"),
                ("--margin-top", "0"),
                ("--margin-bottom", "0"),
                ("--max-toc-links", "0"),
                ("--expand-css", ""),
                ("--use-auto-toc", ""),
                ("--extra-css", IPHONE_CSS),
            ],
        ),
    ]
});

/// Resolves a template by key, falling back to `default` for unknown keys.
pub fn resolve(key: &str) -> &'static Template {
    CATALOG
        .iter()
        .find(|t| t.key == key)
        .unwrap_or_else(|| resolve("default"))
}

/// All built-in templates.
pub fn all() -> &'static [Template] {
    &CATALOG
}

/// Whether a key names a built-in template.
pub fn is_valid(key: &str) -> bool {
    CATALOG.iter().any(|t| t.key == key)
}

/// Key/name/description listing for the upload layer.
pub fn available() -> Vec<TemplateInfo> {
    CATALOG.iter().map(TemplateInfo::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::EbookFormat;
    use crate::templates::types::MOBI_INCOMPATIBLE_FLAGS;

    #[test]
    fn test_resolve_known_key() {
        assert_eq!(resolve("novel").key, "novel");
        assert_eq!(resolve("children").key, "children");
    }

    #[test]
    fn test_resolve_unknown_falls_back_to_default() {
        assert_eq!(resolve("no-such-template").key, "default");
        assert_eq!(resolve("").key, "default");
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid("default"));
        assert!(is_valid("fullscreen"));
        assert!(!is_valid("iphone"));
    }

    #[test]
    fn test_available_lists_every_template() {
        let infos = available();
        assert_eq!(infos.len(), all().len());
        assert_eq!(infos.len(), 9);
        assert!(infos.iter().any(|i| i.key == "magazine"));
        assert!(infos.iter().any(|i| i.key == "iphone15"));
    }

    #[test]
    fn test_iphone_template_settings() {
        let template = resolve("iphone15");
        let flags: Vec<&str> = template.options.iter().map(|o| o.flag.as_str()).collect();
        assert!(flags.contains(&"--use-auto-toc"));
        let css = template
            .options
            .iter()
            .find(|o| o.flag == "--extra-css")
            .unwrap();
        assert!(css.value.contains("SF Pro Text"));
    }

    #[test]
    fn test_no_template_emits_mobi_incompatible_options() {
        for template in all() {
            let settings = template.settings_for(EbookFormat::Mobi);
            for opt in &settings {
                assert!(
                    !MOBI_INCOMPATIBLE_FLAGS.contains(&opt.flag.as_str()),
                    "template {} leaks {} for mobi",
                    template.key,
                    opt.flag
                );
            }
        }
    }

    #[test]
    fn test_no_template_carries_ipad_profile_into_mobi() {
        for template in all() {
            for opt in template.settings_for(EbookFormat::Mobi) {
                if opt.flag == "--output-profile" {
                    assert_ne!(opt.value, "ipad3", "template {}", template.key);
                }
            }
        }
    }

    #[test]
    fn test_option_order_is_stable() {
        let novel = resolve("novel");
        let flags: Vec<&str> = novel.options.iter().map(|o| o.flag.as_str()).collect();
        assert_eq!(flags[0], "--output-profile");
        assert_eq!(*flags.last().unwrap(), "--disable-font-rescaling");
        // Two resolutions observe the identical definition order.
        assert_eq!(novel.options, resolve("novel").options);
    }
}
