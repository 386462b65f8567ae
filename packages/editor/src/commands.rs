//! # Command Registry
//!
//! Named operations registered against one representation and dispatched
//! uniformly. Resolution happens at call time: the registry consults the
//! active mode on every `exec`, so a command name can carry a markup body and
//! a tree body and the right one runs without the caller caring which mode is
//! on.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::errors::EditorError;
use crate::events::EventHub;
use crate::mode::EditMode;
use crate::widgets::{MarkupWidget, TreeWidget};

/// Error a command body may produce.
pub type CommandError = Box<dyn std::error::Error + Send + Sync>;

pub type CommandResult = Result<(), CommandError>;

type MarkupAction =
    Box<dyn FnMut(&Rc<RefCell<dyn MarkupWidget>>, &CommandContext<'_>) -> CommandResult>;
type TreeAction = Box<dyn FnMut(&Rc<RefCell<dyn TreeWidget>>, &CommandContext<'_>) -> CommandResult>;

/// Collaborators available to a command body for the duration of one
/// dispatch. The active widget is passed separately, as the shared handle:
/// bodies borrow it per access, so a command may emit events whose listeners
/// read the widget in between.
pub struct CommandContext<'a> {
    pub hub: &'a EventHub,
    pub payload: &'a serde_json::Value,
}

/// A command body, tagged with the representation it operates on. The tag is
/// checked at dispatch, so a tree command can never see a markup widget.
pub enum CommandAction {
    Markup(MarkupAction),
    Tree(TreeAction),
}

impl CommandAction {
    pub fn target(&self) -> EditMode {
        match self {
            CommandAction::Markup(_) => EditMode::Markup,
            CommandAction::Tree(_) => EditMode::Tree,
        }
    }
}

/// A named command ready for registration.
pub struct Command {
    pub name: String,
    pub action: CommandAction,
}

impl Command {
    pub fn markup<F>(name: impl Into<String>, body: F) -> Self
    where
        F: FnMut(&Rc<RefCell<dyn MarkupWidget>>, &CommandContext<'_>) -> CommandResult + 'static,
    {
        Self {
            name: name.into(),
            action: CommandAction::Markup(Box::new(body)),
        }
    }

    pub fn tree<F>(name: impl Into<String>, body: F) -> Self
    where
        F: FnMut(&Rc<RefCell<dyn TreeWidget>>, &CommandContext<'_>) -> CommandResult + 'static,
    {
        Self {
            name: name.into(),
            action: CommandAction::Tree(Box::new(body)),
        }
    }
}

/// Per-representation command tables. Registering the same name for the same
/// representation twice replaces the earlier body.
#[derive(Default)]
pub struct CommandRegistry {
    markup: HashMap<String, MarkupAction>,
    tree: HashMap<String, TreeAction>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Command) {
        match command.action {
            CommandAction::Markup(body) => {
                self.markup.insert(command.name, body);
            }
            CommandAction::Tree(body) => {
                self.tree.insert(command.name, body);
            }
        }
    }

    /// Whether `name` is registered for any representation.
    pub fn is_registered(&self, name: &str) -> bool {
        self.markup.contains_key(name) || self.tree.contains_key(name)
    }

    /// Dispatch `name` against the representation active right now.
    ///
    /// The body receives the active widget handle unborrowed; a failing body
    /// surfaces as [`EditorError::CommandFailed`] with no retry.
    pub fn exec(
        &mut self,
        name: &str,
        active: EditMode,
        markup: &Rc<RefCell<dyn MarkupWidget>>,
        tree: &Rc<RefCell<dyn TreeWidget>>,
        ctx: &CommandContext<'_>,
    ) -> Result<(), EditorError> {
        tracing::debug!(command = name, mode = %active, "exec");
        let outcome = match active {
            EditMode::Markup => match self.markup.get_mut(name) {
                Some(body) => body(markup, ctx),
                None => return Err(self.miss(name, active)),
            },
            EditMode::Tree => match self.tree.get_mut(name) {
                Some(body) => body(tree, ctx),
                None => return Err(self.miss(name, active)),
            },
        };

        outcome.map_err(|source| EditorError::CommandFailed {
            name: name.to_string(),
            message: source.to_string(),
        })
    }

    fn miss(&self, name: &str, active: EditMode) -> EditorError {
        let other = active.other();
        let registered_for_other = match other {
            EditMode::Markup => self.markup.contains_key(name),
            EditMode::Tree => self.tree.contains_key(name),
        };
        if registered_for_other {
            EditorError::CommandTargetMismatch {
                name: name.to_string(),
                active,
                target: other,
            }
        } else {
            EditorError::UnknownCommand(name.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventPayload;
    use crate::widgets::{MarkupBuffer, TreeBuffer};
    use marksync_tree::Node;

    fn fixtures() -> (
        CommandRegistry,
        Rc<RefCell<dyn MarkupWidget>>,
        Rc<RefCell<dyn TreeWidget>>,
        EventHub,
    ) {
        (
            CommandRegistry::new(),
            Rc::new(RefCell::new(MarkupBuffer::default())),
            Rc::new(RefCell::new(TreeBuffer::default())),
            EventHub::new(),
        )
    }

    fn ctx(hub: &EventHub) -> CommandContext<'_> {
        CommandContext {
            hub,
            payload: &serde_json::Value::Null,
        }
    }

    #[test]
    fn test_markup_command_mutates_markup_widget() {
        let (mut registry, markup, tree, hub) = fixtures();
        registry.register(Command::markup("shout", |widget, _| {
            let upper = widget.borrow().value().to_uppercase();
            widget.borrow_mut().set_value(&upper);
            Ok(())
        }));
        markup.borrow_mut().set_value("hello");

        registry
            .exec("shout", EditMode::Markup, &markup, &tree, &ctx(&hub))
            .unwrap();
        assert_eq!(markup.borrow().value(), "HELLO");
    }

    #[test]
    fn test_command_may_emit_to_a_listener_that_reads_the_widget() {
        let (mut registry, markup, tree, hub) = fixtures();
        let seen = Rc::new(RefCell::new(String::new()));
        let seen2 = seen.clone();
        let markup2 = markup.clone();
        hub.listen("annotated", move |_: &EventPayload| {
            *seen2.borrow_mut() = markup2.borrow().value();
            Ok(())
        });
        registry.register(Command::markup("annotate", |widget, ctx| {
            widget.borrow_mut().set_value("updated");
            ctx.hub.emit("annotated", &EventPayload::None)?;
            Ok(())
        }));

        registry
            .exec("annotate", EditMode::Markup, &markup, &tree, &ctx(&hub))
            .unwrap();
        assert_eq!(*seen.borrow(), "updated");
    }

    #[test]
    fn test_unknown_command() {
        let (mut registry, markup, tree, hub) = fixtures();
        let err = registry
            .exec("nothing", EditMode::Markup, &markup, &tree, &ctx(&hub))
            .unwrap_err();
        assert!(matches!(err, EditorError::UnknownCommand(name) if name == "nothing"));
    }

    #[test]
    fn test_target_mismatch_when_registered_only_for_other_mode() {
        let (mut registry, markup, tree, hub) = fixtures();
        registry.register(Command::tree("wrap", |_, _| Ok(())));

        let err = registry
            .exec("wrap", EditMode::Markup, &markup, &tree, &ctx(&hub))
            .unwrap_err();
        assert!(matches!(
            err,
            EditorError::CommandTargetMismatch {
                active: EditMode::Markup,
                target: EditMode::Tree,
                ..
            }
        ));
    }

    #[test]
    fn test_same_name_resolves_per_active_mode() {
        let (mut registry, markup, tree, hub) = fixtures();
        registry.register(Command::markup("mark", |widget, _| {
            widget.borrow_mut().set_value("markup ran");
            Ok(())
        }));
        registry.register(Command::tree("mark", |widget, _| {
            widget
                .borrow_mut()
                .set_value(Node::document(vec![Node::paragraph(vec![Node::text(
                    "tree ran",
                )])]));
            Ok(())
        }));

        registry
            .exec("mark", EditMode::Markup, &markup, &tree, &ctx(&hub))
            .unwrap();
        assert_eq!(markup.borrow().value(), "markup ran");
        assert_eq!(tree.borrow().value(), Node::default());

        registry
            .exec("mark", EditMode::Tree, &markup, &tree, &ctx(&hub))
            .unwrap();
        assert_eq!(tree.borrow().value().text_content(), "tree ran");
    }

    #[test]
    fn test_failing_body_surfaces_as_command_failed() {
        let (mut registry, markup, tree, hub) = fixtures();
        registry.register(Command::markup("bad", |_, _| Err("out of ink".into())));

        let err = registry
            .exec("bad", EditMode::Markup, &markup, &tree, &ctx(&hub))
            .unwrap_err();
        match err {
            EditorError::CommandFailed { name, message } => {
                assert_eq!(name, "bad");
                assert_eq!(message, "out of ink");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reregistration_replaces_body() {
        let (mut registry, markup, tree, hub) = fixtures();
        registry.register(Command::markup("fill", |widget, _| {
            widget.borrow_mut().set_value("first");
            Ok(())
        }));
        registry.register(Command::markup("fill", |widget, _| {
            widget.borrow_mut().set_value("second");
            Ok(())
        }));

        registry
            .exec("fill", EditMode::Markup, &markup, &tree, &ctx(&hub))
            .unwrap();
        assert_eq!(markup.borrow().value(), "second");
    }

    #[test]
    fn test_command_payload_reaches_body() {
        let (mut registry, markup, tree, hub) = fixtures();
        registry.register(Command::markup("insert", |widget, ctx| {
            let text = ctx.payload.as_str().ok_or("missing text payload")?;
            let mut value = widget.borrow().value();
            value.push_str(text);
            widget.borrow_mut().set_value(&value);
            Ok(())
        }));
        markup.borrow_mut().set_value("start ");

        let payload = serde_json::json!("end");
        let ctx = CommandContext {
            hub: &hub,
            payload: &payload,
        };
        registry
            .exec("insert", EditMode::Markup, &markup, &tree, &ctx)
            .unwrap();
        assert_eq!(markup.borrow().value(), "start end");
    }
}
