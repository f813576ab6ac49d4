use crate::config::KeyBindingConfig;
use crate::internal::ui::app::Action;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ConflictReport {
    pub description: String,
    pub keys: String,
    pub context: String,
}

/// Report screen-specific bindings that shadow a global binding with a
/// different action. Shadowing with the same action is redundant but harmless.
pub fn detect_conflicts(config: &KeyBindingConfig) -> Vec<ConflictReport> {
    let mut conflicts = Vec::new();

    let mut check_context = |context_name: &str, bindings: &HashMap<String, Action>| {
        let mut keys: Vec<_> = bindings.keys().collect();
        keys.sort();
        for key in keys {
            let action = &bindings[key];
            if let Some(global_action) = config.global.get(key)
                && global_action != action
            {
                conflicts.push(ConflictReport {
                    description: format!(
                        "{} key '{}' shadows Global key (Global: {:?}, {}: {:?})",
                        context_name, key, global_action, context_name, action
                    ),
                    keys: key.clone(),
                    context: context_name.to_string(),
                });
            }
        }
    };

    check_context("Gallery", &config.gallery);
    check_context("Jokes", &config.jokes);
    check_context("Not Found", &config.not_found);

    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_shadowing_with_different_action() {
        let mut config = KeyBindingConfig::default();
        config.global.insert("x".to_string(), Action::ToggleTheme);
        config.jokes.insert("x".to_string(), Action::LikeSelected);
        config.gallery.insert("x".to_string(), Action::ToggleTheme);

        let conflicts = detect_conflicts(&config);

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].context, "Jokes");
        assert_eq!(conflicts[0].keys, "x");
    }

    #[test]
    fn test_no_conflicts_for_disjoint_keys() {
        let mut config = KeyBindingConfig::default();
        config.global.insert("t".to_string(), Action::ToggleTheme);
        config.jokes.insert("l".to_string(), Action::LikeSelected);

        assert!(detect_conflicts(&config).is_empty());
    }
}
