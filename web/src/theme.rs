use clap::ValueEnum;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub const ATTR_NAME: &'static str = "data-theme";
    pub const ALL: [Option<Theme>; 3] = [None, Some(Theme::Light), Some(Theme::Dark)];

    pub(crate) const fn scheme(self) -> &'static str {
        use Theme::*;
        match self {
            Light => "light",
            Dark => "dark",
        }
    }

    pub(crate) const fn label(theme: Option<Self>) -> &'static str {
        match theme {
            None => "Auto",
            Some(Theme::Light) => "Light",
            Some(Theme::Dark) => "Dark",
        }
    }

    /// `None` clears the attribute so the stylesheet follows `prefers-color-scheme`.
    pub(crate) fn apply(theme: Option<Self>) {
        use gloo::utils::document;
        let Some(html) = document().document_element() else {
            log::error!("document has no root element");
            return;
        };
        if let Some(theme) = theme {
            let scheme = theme.scheme();
            log::debug!("theme-scheme: {}", scheme);
            if let Err(err) = html.set_attribute(Self::ATTR_NAME, scheme) {
                log::error!("failed to set theme: {:?}", err);
            }
        } else {
            log::debug!("no theme preference");
            if let Err(err) = html.remove_attribute(Self::ATTR_NAME) {
                log::error!("failed to set theme: {:?}", err);
            }
        }
    }
}
