//! # Command Registry
//!
//! Owns the enabled command set and routes each `command` event to exactly one handler.
//! Specific commands are matched first-registered-first; when none accepts the word, the
//! mandatory fallback handles it.

use crate::application::bus::{EventBus, Listener};
use crate::domain::config::AppConfig;
use crate::domain::context::Context;
use crate::domain::events::{self, Payload};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// A named, toggle-gated handler matched against a parsed command word.
#[async_trait]
pub trait Command: Send + Sync {
    /// Identity for toggling and help listings.
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    fn icon(&self) -> Option<&str> {
        None
    }

    /// Hidden commands dispatch normally but are left out of help.
    fn hidden(&self) -> bool {
        false
    }

    /// Receives the lower-cased command word.
    fn accept(&self, command: &str) -> bool;

    async fn handle(
        &self,
        args: &[String],
        context: &Context,
        bus: &EventBus,
        command: &str,
    ) -> Result<()>;
}

/// Setup-time hook that registers zero or more commands.
pub type CommandProvider = fn(&Arc<CommandRegistry>, &AppConfig);

pub struct CommandRegistry {
    toggles: HashMap<String, bool>,
    commands: RwLock<Vec<Arc<dyn Command>>>,
    fallback: Arc<dyn Command>,
}

impl CommandRegistry {
    pub fn new(toggles: HashMap<String, bool>, fallback: Arc<dyn Command>) -> Self {
        Self {
            toggles,
            commands: RwLock::new(Vec::new()),
            fallback,
        }
    }

    /// Register a command if its toggle is explicitly on. Names are not deduplicated.
    pub fn add_command(&self, command: Arc<dyn Command>) {
        let toggle = self.toggles.get(command.name()).copied().unwrap_or(false);
        tracing::debug!(command = command.name(), toggle, action = "register");
        if toggle {
            self.commands
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .push(command);
        }
    }

    /// Enabled commands in registration order.
    pub fn get_commands(&self, with_hidden: bool) -> Vec<Arc<dyn Command>> {
        let commands = self
            .commands
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        commands
            .iter()
            .filter(|command| with_hidden || !command.hidden())
            .cloned()
            .collect()
    }

    #[cfg(test)]
    pub fn fallback(&self) -> &Arc<dyn Command> {
        &self.fallback
    }

    /// The single command that will handle `command`.
    pub fn resolve(&self, command: &str) -> Arc<dyn Command> {
        self.get_commands(true)
            .into_iter()
            .find(|candidate| candidate.accept(command))
            .unwrap_or_else(|| self.fallback.clone())
    }

    pub async fn exec(
        &self,
        bus: &EventBus,
        command: &str,
        args: &[String],
        context: &Context,
    ) -> Result<()> {
        let handler = self.resolve(command);
        tracing::debug!(command, handler = handler.name(), "dispatch");
        handler.handle(args, context, bus, command).await
    }
}

#[async_trait]
impl Listener for CommandRegistry {
    fn accept(&self, event_type: &str) -> bool {
        event_type == events::COMMAND
    }

    async fn notify(&self, payload: &Payload, bus: &EventBus) -> Result<()> {
        match payload {
            Payload::Command(request) => {
                self.exec(bus, &request.command, &request.args, &request.context)
                    .await
            }
            other => {
                tracing::warn!(?other, "Command event without a command payload");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CommandRequest;
    use std::sync::Mutex;

    type Calls = Arc<Mutex<Vec<(&'static str, String, Vec<String>)>>>;

    /// Command double that records the words it handled.
    struct Stub {
        name: &'static str,
        word: Option<&'static str>,
        hidden: bool,
        calls: Calls,
    }

    #[async_trait]
    impl Command for Stub {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "stub"
        }

        fn hidden(&self) -> bool {
            self.hidden
        }

        fn accept(&self, command: &str) -> bool {
            self.word.is_none_or(|word| word == command)
        }

        async fn handle(
            &self,
            args: &[String],
            _context: &Context,
            _bus: &EventBus,
            command: &str,
        ) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((self.name, command.to_string(), args.to_vec()));
            Ok(())
        }
    }

    fn stub(name: &'static str, word: Option<&'static str>, hidden: bool, calls: &Calls) -> Arc<Stub> {
        Arc::new(Stub {
            name,
            word,
            hidden,
            calls: calls.clone(),
        })
    }

    fn registry(enabled: &[&str], calls: &Calls) -> CommandRegistry {
        let toggles = enabled.iter().map(|n| (n.to_string(), true)).collect();
        CommandRegistry::new(toggles, stub("Default", None, true, calls))
    }

    fn names(commands: &[Arc<dyn Command>]) -> Vec<String> {
        commands.iter().map(|c| c.name().to_string()).collect()
    }

    #[test]
    fn test_toggle_gate() {
        let calls = Calls::default();
        let mut toggles = HashMap::new();
        toggles.insert("Off".to_string(), false);
        toggles.insert("On".to_string(), true);
        let reg = CommandRegistry::new(toggles, stub("Default", None, true, &calls));

        reg.add_command(stub("Absent", Some("absent"), false, &calls));
        reg.add_command(stub("Off", Some("off"), false, &calls));
        assert!(reg.get_commands(true).is_empty());

        reg.add_command(stub("On", Some("on"), false, &calls));
        assert_eq!(names(&reg.get_commands(true)), vec!["On"]);
    }

    #[test]
    fn test_duplicate_registration_is_kept() {
        let calls = Calls::default();
        let reg = registry(&["Twice"], &calls);
        reg.add_command(stub("Twice", Some("x"), false, &calls));
        reg.add_command(stub("Twice", Some("x"), false, &calls));
        assert_eq!(reg.get_commands(true).len(), 2);
    }

    #[test]
    fn test_hidden_filtered_from_listing() {
        let calls = Calls::default();
        let reg = registry(&["Visible", "Secret"], &calls);
        reg.add_command(stub("Secret", Some("spc"), true, &calls));
        reg.add_command(stub("Visible", Some("rps"), false, &calls));

        assert_eq!(names(&reg.get_commands(false)), vec!["Visible"]);
        assert_eq!(names(&reg.get_commands(true)), vec!["Secret", "Visible"]);
    }

    #[tokio::test]
    async fn test_first_match_wins() {
        let calls = Calls::default();
        let reg = registry(&["First", "Second"], &calls);
        reg.add_command(stub("First", Some("roll"), false, &calls));
        reg.add_command(stub("Second", Some("roll"), false, &calls));

        let bus = EventBus::new();
        reg.exec(&bus, "roll", &["1d6".to_string()], &Context::default())
            .await
            .unwrap();

        let calls = calls.lock().unwrap().clone();
        assert_eq!(calls, vec![("First", "roll".to_string(), vec!["1d6".to_string()])]);
    }

    #[tokio::test]
    async fn test_hidden_commands_dispatch() {
        let calls = Calls::default();
        let reg = registry(&["Secret"], &calls);
        reg.add_command(stub("Secret", Some("spc"), true, &calls));

        reg.exec(&EventBus::new(), "spc", &[], &Context::default())
            .await
            .unwrap();
        assert_eq!(calls.lock().unwrap()[0].0, "Secret");
    }

    #[tokio::test]
    async fn test_unmatched_word_goes_to_fallback() {
        let calls = Calls::default();
        let reg = registry(&["Roll"], &calls);
        reg.add_command(stub("Roll", Some("roll"), false, &calls));

        reg.exec(&EventBus::new(), "nonsense", &[], &Context::default())
            .await
            .unwrap();
        assert_eq!(calls.lock().unwrap()[0].0, "Default");
        assert_eq!(reg.fallback().name(), "Default");
    }

    #[tokio::test]
    async fn test_dispatch_through_bus() {
        let calls = Calls::default();
        let reg = Arc::new(registry(&["Roll"], &calls));
        reg.add_command(stub("Roll", Some("roll"), false, &calls));

        let bus = EventBus::new();
        bus.add_listener(reg.clone());
        bus.notify(
            events::COMMAND,
            Payload::Command(CommandRequest {
                command: "roll".into(),
                args: vec!["2d6".into()],
                context: Context::new("test", 0),
            }),
        )
        .await
        .unwrap();

        assert_eq!(calls.lock().unwrap().len(), 1);

        // Other event types never reach the registry.
        bus.notify(events::INFO, Payload::Log { msg: "hi".into() })
            .await
            .unwrap();
        assert_eq!(calls.lock().unwrap().len(), 1);
    }
}
