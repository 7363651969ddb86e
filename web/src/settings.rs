use clap::ValueEnum;
use statrace_core::{GameConfig, Pips, Ruleset};
use yew::prelude::*;

use crate::theme::Theme;
use crate::utils::Modal;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum RulesetArg {
    Classic,
    #[default]
    Powers,
}

impl From<RulesetArg> for Ruleset {
    fn from(arg: RulesetArg) -> Self {
        match arg {
            RulesetArg::Classic => Ruleset::Classic,
            RulesetArg::Powers => Ruleset::Powers,
        }
    }
}

/// In-memory preferences; nothing here outlives the page.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct Settings {
    pub theme: Option<Theme>,
    pub ruleset: Ruleset,
    pub max_step: Option<Pips>,
}

impl Settings {
    pub(crate) fn game_config(&self) -> GameConfig {
        GameConfig::new(self.ruleset).with_max_step(self.max_step)
    }

    pub(crate) const fn ruleset_label(ruleset: Ruleset) -> &'static str {
        match ruleset {
            Ruleset::Classic => "Classic",
            Ruleset::Powers => "Powers",
        }
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct SettingsProps {
    pub settings: Settings,
    pub on_apply: Callback<Settings>,
    pub on_cancel: Callback<()>,
}

#[function_component]
pub(crate) fn SettingsView(props: &SettingsProps) -> Html {
    let draft = use_state(|| props.settings);

    let theme_buttons = Theme::ALL.into_iter().map(|theme| {
        let draft = draft.clone();
        let selected = draft.theme == theme;
        let onclick = Callback::from(move |_: MouseEvent| {
            draft.set(Settings { theme, ..*draft });
        });
        html! {
            <li><button class={classes!(selected.then_some("selected"))} {onclick}>{Theme::label(theme)}</button></li>
        }
    });

    let ruleset_buttons = [Ruleset::Classic, Ruleset::Powers].into_iter().map(|ruleset| {
        let draft = draft.clone();
        let selected = draft.ruleset == ruleset;
        let onclick = Callback::from(move |_: MouseEvent| {
            draft.set(Settings { ruleset, ..*draft });
        });
        html! {
            <li><button class={classes!(selected.then_some("selected"))} {onclick}>{Settings::ruleset_label(ruleset)}</button></li>
        }
    });

    let on_apply = {
        let draft = draft.clone();
        let on_apply = props.on_apply.clone();
        Callback::from(move |_: MouseEvent| on_apply.emit(*draft))
    };
    let on_cancel = props.on_cancel.reform(|_: MouseEvent| ());

    html! {
        <Modal>
            <dialog id="settings" open={true}>
                <article>
                    <h2>{"Settings"}</h2>
                    <h3>{"Theme"}</h3>
                    <ul>{ for theme_buttons }</ul>
                    <h3>{"Rules"}</h3>
                    <ul>{ for ruleset_buttons }</ul>
                    <p><small>{"Rule changes take effect on the next reset."}</small></p>
                    <footer>
                        <button type="reset" onclick={on_cancel}>{"Cancel"}</button>
                        <button onclick={on_apply}>{"Apply"}</button>
                    </footer>
                </article>
            </dialog>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_build_game_config() {
        let settings = Settings {
            theme: None,
            ruleset: RulesetArg::Classic.into(),
            max_step: Some(5),
        };
        let config = settings.game_config();
        assert_eq!(config.ruleset, Ruleset::Classic);
        assert_eq!(config.movement(9), 5);
    }

    #[test]
    fn default_ruleset_has_powers() {
        assert_eq!(Ruleset::from(RulesetArg::default()), Ruleset::Powers);
        assert_eq!(Settings::default().ruleset, Ruleset::Powers);
    }
}
