use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key binding configuration
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub label: &'static str,
    pub description: &'static str,
}

impl KeyBinding {
    pub const fn new(key: KeyCode, modifiers: KeyModifiers, label: &'static str, description: &'static str) -> Self {
        Self {
            key,
            modifiers,
            label,
            description,
        }
    }

    const fn plain(key: char, description: &'static str) -> Self {
        Self::new(KeyCode::Char(key), KeyModifiers::NONE, "", description)
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        // Shifted characters arrive with SHIFT set on some terminals.
        let modifiers = event.modifiers.difference(KeyModifiers::SHIFT);
        self.key == event.code && self.modifiers == modifiers
    }
}

/// Cart page key mappings
#[derive(Debug, Clone)]
pub struct KeyMap {
    pub force_quit: KeyBinding,
    pub quit: KeyBinding,
    pub remove: KeyBinding,
    pub clear: KeyBinding,
    pub increment: KeyBinding,
    pub decrement: KeyBinding,
    pub checkout: KeyBinding,
    pub reload: KeyBinding,
    pub about: KeyBinding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            force_quit: KeyBinding::new(KeyCode::Char('c'), KeyModifiers::CONTROL, "ctrl+c", "Quit"),
            quit: KeyBinding::plain('q', "Quit"),
            remove: KeyBinding::plain('r', "Remove"),
            clear: KeyBinding::plain('c', "Clear cart"),
            increment: KeyBinding::plain('+', "More"),
            decrement: KeyBinding::plain('-', "Less"),
            checkout: KeyBinding::plain('o', "Checkout"),
            reload: KeyBinding::plain('l', "Reload"),
            about: KeyBinding::plain('i', "About"),
        }
    }
}

impl KeyMap {
    pub fn should_quit(&self, event: &KeyEvent) -> bool {
        self.force_quit.matches(event)
    }

    /// One-line help for the status bar
    pub fn help_text(&self) -> String {
        [
            &self.remove,
            &self.clear,
            &self.decrement,
            &self.increment,
            &self.checkout,
            &self.reload,
            &self.about,
            &self.quit,
        ]
        .iter()
        .map(|binding| {
            let key = match binding.key {
                KeyCode::Char(c) if binding.label.is_empty() => c.to_string(),
                _ => binding.label.to_string(),
            };
            format!("{} {}", key, binding.description)
        })
        .collect::<Vec<_>>()
        .join(" • ")
    }
}
