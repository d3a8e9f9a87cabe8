use std::path::PathBuf;

use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::notification::NotificationList;
use gpui_component::{
    ActiveTheme, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex, v_flex,
};
use lawwise_chat::Persona;

use crate::chat::ChatView;
use crate::settings::{SettingsChanged, SettingsState};

/// Returns the default themes directory path.
/// This is a pure function to allow deterministic testing of path resolution.
pub fn default_themes_path() -> PathBuf {
    PathBuf::from("./themes")
}

#[cfg(target_os = "macos")]
const WINDOW_TOOLBAR_LEFT_SAFE_PADDING: f32 = 78.0;
#[cfg(not(target_os = "macos"))]
const WINDOW_TOOLBAR_LEFT_SAFE_PADDING: f32 = 16.0;
#[cfg(target_os = "windows")]
const WINDOW_TOOLBAR_RIGHT_SAFE_PADDING: f32 = 120.0;
#[cfg(not(target_os = "windows"))]
const WINDOW_TOOLBAR_RIGHT_SAFE_PADDING: f32 = 16.0;

gpui::actions!(shell, [OpenLawyers, OpenUsers, Quit]);

/// Computes the top toolbar height using a Zed-style responsive formula.
fn window_toolbar_height(window: &Window) -> Pixels {
    (1.75 * window.rem_size()).max(px(34.0))
}

/// Light/dark switch shown in every page header.
pub struct ThemeToggle {
    settings_state: Entity<SettingsState>,
}

impl ThemeToggle {
    pub fn new(settings_state: Entity<SettingsState>, cx: &mut Context<Self>) -> Self {
        cx.observe(&settings_state, |_, _, cx| cx.notify()).detach();
        Self { settings_state }
    }

    fn toggle(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let shown = cx.theme().mode;
        let next = self.settings_state.read(cx).settings().toggled_from(shown);
        next.apply_theme(Some(window), cx);

        let theme_mode = next.theme_mode;
        let result = self
            .settings_state
            .update(cx, |state, cx| state.update_settings(next, cx));

        match result {
            Ok(()) => tracing::info!(mode = theme_mode.name(), "theme toggled"),
            Err(error) => tracing::error!(
                mode = theme_mode.name(),
                "theme toggled for this session only: {error}"
            ),
        }
    }
}

impl Render for ThemeToggle {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let is_dark = cx.theme().mode.is_dark();
        let icon = if is_dark {
            IconName::Sun
        } else {
            IconName::Moon
        };

        Button::new("theme-toggle")
            .ghost()
            .small()
            .icon(icon)
            .on_click(cx.listener(|this, _, window, cx| {
                this.toggle(window, cx);
            }))
    }
}

/// One persona page: header with title and theme toggle above a chat surface.
pub struct PersonaShell {
    persona: Persona,
    chat_view: Entity<ChatView>,
    theme_toggle: Entity<ThemeToggle>,
}

impl PersonaShell {
    pub fn new(
        persona: Persona,
        settings_state: Entity<SettingsState>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let chat_view = cx.new(|cx| ChatView::new(persona, window, cx));
        let theme_toggle = cx.new(|cx| ThemeToggle::new(settings_state, cx));

        Self {
            persona,
            chat_view,
            theme_toggle,
        }
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn chat_view(&self) -> &Entity<ChatView> {
        &self.chat_view
    }
}

impl Render for PersonaShell {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .id("persona-shell")
            .size_full()
            .child(
                h_flex()
                    .id("persona-header")
                    .w_full()
                    .flex_shrink_0()
                    .p_4()
                    .items_center()
                    .justify_between()
                    .bg(theme.primary)
                    .text_color(theme.primary_foreground)
                    .shadow_md()
                    .child(
                        div()
                            .text_2xl()
                            .font_weight(FontWeight::BOLD)
                            .child(self.persona.title()),
                    )
                    .child(self.theme_toggle.clone()),
            )
            .child(
                div()
                    .id("persona-main")
                    .flex_1()
                    .min_h_0()
                    .p_4()
                    .child(self.chat_view.clone()),
            )
    }
}

/// Root layout: route bar plus the page for the current route.
///
/// Switching routes replaces the page entity, so the previous conversation and
/// any reply still pending for it are dropped with it.
pub struct ChatAppShell {
    notification_list: Entity<NotificationList>,
    settings_state: Entity<SettingsState>,
    page: Entity<PersonaShell>,
    title_bar_should_move: bool,
}

impl ChatAppShell {
    pub fn new(
        initial: Persona,
        notification_list: Entity<NotificationList>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let settings_state = SettingsState::new(cx);
        let page = Self::mount_page(initial, &settings_state, window, cx);

        cx.subscribe(&settings_state, |_, _, event: &SettingsChanged, cx| {
            tracing::debug!(mode = event.settings.theme_mode.name(), "settings changed");
            cx.refresh_windows();
        })
        .detach();

        Self {
            notification_list,
            settings_state,
            page,
            title_bar_should_move: false,
        }
    }

    pub fn route(&self, cx: &App) -> Persona {
        self.page.read(cx).persona()
    }

    pub fn navigate(&mut self, persona: Persona, window: &mut Window, cx: &mut Context<Self>) {
        if self.route(cx) == persona {
            return;
        }

        tracing::info!(route = persona.route(), "navigating");
        self.page = Self::mount_page(persona, &self.settings_state, window, cx);
        cx.notify();
    }

    fn mount_page(
        persona: Persona,
        settings_state: &Entity<SettingsState>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Entity<PersonaShell> {
        let settings_state = settings_state.clone();
        let page = cx.new(|cx| PersonaShell::new(persona, settings_state, window, cx));
        let chat_view = page.read(cx).chat_view().clone();
        chat_view.update(cx, |chat_view, cx| chat_view.focus_input(window, cx));
        page
    }
}

impl Render for ChatAppShell {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let toolbar_height = window_toolbar_height(window);

        div()
            .id("app-shell")
            .size_full()
            .relative()
            .bg(theme.background)
            .text_color(theme.foreground)
            .on_action(cx.listener(|this, _: &OpenLawyers, window, cx| {
                this.navigate(Persona::Lawyer, window, cx);
            }))
            .on_action(cx.listener(|this, _: &OpenUsers, window, cx| {
                this.navigate(Persona::User, window, cx);
            }))
            .child(
                v_flex()
                    .size_full()
                    .child(self.render_top_bar(window, toolbar_height, cx))
                    .child(
                        div()
                            .id("main-content")
                            .flex_1()
                            .min_h_0()
                            .overflow_hidden()
                            .child(self.page.clone()),
                    ),
            )
            .child(self.notification_list.clone())
    }
}

impl ChatAppShell {
    fn render_top_bar(
        &self,
        window: &Window,
        toolbar_height: Pixels,
        cx: &Context<Self>,
    ) -> impl IntoElement {
        let theme = cx.theme();
        let current = self.route(cx);

        h_flex()
            .id("app-top-bar")
            .window_control_area(WindowControlArea::Drag)
            .on_mouse_down_out(cx.listener(|this, _, _window, _cx| {
                this.title_bar_should_move = false;
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, _, _window, _cx| {
                    this.title_bar_should_move = false;
                }),
            )
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, _, _window, _cx| {
                    this.title_bar_should_move = true;
                }),
            )
            .on_mouse_move(cx.listener(|this, _, window, _cx| {
                if this.title_bar_should_move {
                    this.title_bar_should_move = false;
                    window.start_window_move();
                }
            }))
            .w_full()
            .h(toolbar_height)
            .flex_shrink_0()
            .pl(px(WINDOW_TOOLBAR_LEFT_SAFE_PADDING))
            .pr(px(WINDOW_TOOLBAR_RIGHT_SAFE_PADDING))
            .items_center()
            .justify_between()
            .bg(theme.background)
            .border_b_1()
            .border_color(theme.border)
            .child(
                h_flex()
                    .id("route-nav")
                    .gap_1()
                    .items_center()
                    // Keep route clicks from starting a window drag.
                    .on_mouse_down(MouseButton::Left, |_, _, cx| cx.stop_propagation())
                    .children(Persona::ALL.into_iter().map(|persona| {
                        let button = Button::new(persona.route())
                            .small()
                            .child(persona.nav_label());
                        let button = if persona == current {
                            button.primary()
                        } else {
                            button.ghost()
                        };

                        button.on_click(cx.listener(move |this, _, window, cx| {
                            this.navigate(persona, window, cx);
                        }))
                    })),
            )
            .when(
                cfg!(target_os = "linux") && window.window_controls().window_menu,
                |title_bar| {
                    title_bar.on_mouse_down(MouseButton::Right, |event, window, _| {
                        window.show_window_menu(event.position);
                    })
                },
            )
            .child(self.render_linux_window_controls(window, cx))
    }

    fn render_linux_window_controls(&self, window: &Window, cx: &Context<Self>) -> AnyElement {
        #[cfg(target_os = "linux")]
        {
            let maximize_icon = if window.is_maximized() {
                IconName::WindowRestore
            } else {
                IconName::WindowMaximize
            };

            h_flex()
                .id("linux-window-controls")
                .items_center()
                // Window control clicks must not bubble into title bar gestures.
                .on_mouse_down(MouseButton::Left, |_, _, cx| cx.stop_propagation())
                .on_mouse_down(MouseButton::Right, |_, _, cx| cx.stop_propagation())
                .gap_2()
                .ml_2()
                .child(
                    Button::new("linux-window-minimize")
                        .ghost()
                        .small()
                        .icon(IconName::WindowMinimize)
                        .on_click(cx.listener(|_, _, window, _| {
                            window.minimize_window();
                        })),
                )
                .child(
                    Button::new("linux-window-maximize")
                        .ghost()
                        .small()
                        .icon(maximize_icon)
                        .on_click(cx.listener(|_, _, window, _| {
                            window.zoom_window();
                        })),
                )
                .child(
                    Button::new("linux-window-close")
                        .ghost()
                        .small()
                        .icon(IconName::WindowClose)
                        .on_click(cx.listener(|_, _, window, _| {
                            window.remove_window();
                        })),
                )
                .into_any_element()
        }

        #[cfg(not(target_os = "linux"))]
        {
            let _ = (window, cx);
            div().into_any_element()
        }
    }
}

/// Resolves the start-up route from the first CLI argument, falling back to
/// the configured default when it is missing or unknown.
pub fn initial_route(arg: Option<&str>, configured: Persona) -> Persona {
    let Some(raw) = arg else {
        return configured;
    };

    match raw.parse::<Persona>() {
        Ok(persona) => persona,
        Err(error) => {
            tracing::warn!("{error}; opening {}", configured.route());
            configured
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_route_prefers_cli_argument() {
        assert_eq!(initial_route(Some("/lawyers"), Persona::User), Persona::Lawyer);
        assert_eq!(initial_route(Some("user"), Persona::Lawyer), Persona::User);
    }

    #[test]
    fn initial_route_falls_back_to_settings() {
        assert_eq!(initial_route(None, Persona::Lawyer), Persona::Lawyer);
        assert_eq!(initial_route(Some("judges"), Persona::User), Persona::User);
    }

    #[test]
    fn themes_path_is_relative() {
        assert_eq!(default_themes_path(), PathBuf::from("./themes"));
    }
}
