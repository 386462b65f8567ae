//! # Editor façade
//!
//! Owns the collaborators and sequences their wiring. Construction order is
//! part of the contract:
//!
//! 1. event hub
//! 2. structural preview listener (`contentChanged.markup` → convert →
//!    [`RenderSink::render`])
//! 3. command registry, seeded from the config
//! 4. configured hooks bound to their channels
//! 5. configured extensions applied (unknown name is an error)
//! 6. initial mode announced (`changeMode.<initial>`, then `changeMode`)
//! 7. initial content loaded through `set_value`
//!
//! Extensions and hooks therefore observe the initial mode announcement and
//! the initial content load; nothing observes a half-wired editor.
//!
//! Construction is all-or-nothing: any failure returns `Err`, the instance is
//! never added to the registry, and the partially built collaborators are
//! dropped.

use std::cell::RefCell;
use std::rc::Rc;

use crate::commands::{Command, CommandContext, CommandRegistry};
use crate::convert::{Converter, MarkdownConverter};
use crate::errors::EditorError;
use crate::events::{channels, EventHub, EventPayload, ListenerHandle, ListenerResult};
use crate::ext;
use crate::instances::{self, InstanceId};
use crate::mode::{EditMode, ModeMachine, SwitchContext};
use crate::widgets::{HtmlPreview, MarkupBuffer, MarkupWidget, RenderSink, TreeBuffer, TreeWidget};

type HookFn = Box<dyn FnMut(&EventPayload) -> ListenerResult>;

/// Construction-time options. Everything has a default; embedders inject
/// their own widgets, preview sink and converter through the builder methods,
/// and tests do the same to observe or sabotage the collaborators.
#[derive(Default)]
pub struct EditorConfig {
    initial_value: String,
    initial_mode: Option<EditMode>,
    height: Option<String>,
    extensions: Vec<String>,
    hooks: Vec<(String, HookFn)>,
    commands: Vec<Command>,
    converter: Option<Rc<dyn Converter>>,
    markup: Option<Rc<RefCell<dyn MarkupWidget>>>,
    tree: Option<Rc<RefCell<dyn TreeWidget>>>,
    preview: Option<Rc<RefCell<dyn RenderSink>>>,
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_value(mut self, markup: impl Into<String>) -> Self {
        self.initial_value = markup.into();
        self
    }

    pub fn initial_mode(mut self, mode: EditMode) -> Self {
        self.initial_mode = Some(mode);
        self
    }

    /// Layout hint passed through to the embedder; the core never interprets
    /// it.
    pub fn height(mut self, height: impl Into<String>) -> Self {
        self.height = Some(height.into());
        self
    }

    /// Apply the extension `name` during construction. Must have been
    /// defined via [`crate::define_extension`] by then.
    pub fn extension(mut self, name: impl Into<String>) -> Self {
        self.extensions.push(name.into());
        self
    }

    /// Bind `callback` to `channel` during construction, before the initial
    /// lifecycle events fire.
    pub fn hook<F>(mut self, channel: impl Into<String>, callback: F) -> Self
    where
        F: FnMut(&EventPayload) -> ListenerResult + 'static,
    {
        self.hooks.push((channel.into(), Box::new(callback)));
        self
    }

    /// Seed the command registry. This is where an embedder installs its
    /// formatting command set.
    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    pub fn converter(mut self, converter: Rc<dyn Converter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn markup_widget(mut self, widget: Rc<RefCell<dyn MarkupWidget>>) -> Self {
        self.markup = Some(widget);
        self
    }

    pub fn tree_widget(mut self, widget: Rc<RefCell<dyn TreeWidget>>) -> Self {
        self.tree = Some(widget);
        self
    }

    pub fn preview(mut self, sink: Rc<RefCell<dyn RenderSink>>) -> Self {
        self.preview = Some(sink);
        self
    }
}

/// A dual-mode editor instance.
pub struct Editor {
    id: InstanceId,
    registered: bool,
    hub: EventHub,
    commands: CommandRegistry,
    mode: ModeMachine,
    converter: Rc<dyn Converter>,
    markup: Rc<RefCell<dyn MarkupWidget>>,
    tree: Rc<RefCell<dyn TreeWidget>>,
    preview: Rc<RefCell<dyn RenderSink>>,
    height: Option<String>,
}

impl Editor {
    pub fn new(mut config: EditorConfig) -> Result<Self, EditorError> {
        let hub = EventHub::new();

        let converter: Rc<dyn Converter> = match config.converter.take() {
            Some(converter) => converter,
            None => Rc::new(MarkdownConverter),
        };
        let markup: Rc<RefCell<dyn MarkupWidget>> = match config.markup.take() {
            Some(widget) => widget,
            None => Rc::new(RefCell::new(MarkupBuffer::default())),
        };
        let tree: Rc<RefCell<dyn TreeWidget>> = match config.tree.take() {
            Some(widget) => widget,
            None => Rc::new(RefCell::new(TreeBuffer::default())),
        };
        let preview: Rc<RefCell<dyn RenderSink>> = match config.preview.take() {
            Some(sink) => sink,
            None => Rc::new(RefCell::new(HtmlPreview::default())),
        };

        // Structural wiring: markup content changes feed the preview.
        {
            let converter = converter.clone();
            let preview = preview.clone();
            hub.listen(
                channels::CONTENT_CHANGED_MARKUP,
                move |payload: &EventPayload| -> ListenerResult {
                    if let Some(source) = payload.as_text() {
                        let html = converter.to_html(source)?;
                        preview.borrow_mut().render(&html);
                    }
                    Ok(())
                },
            );
        }

        let mut registry = CommandRegistry::new();
        for command in config.commands.drain(..) {
            registry.register(command);
        }

        for (channel, callback) in config.hooks.drain(..) {
            if channel.is_empty() {
                return Err(EditorError::Config(
                    "hook channel name must not be empty".to_string(),
                ));
            }
            hub.listen(channel, callback);
        }

        let initial_mode = config.initial_mode.unwrap_or(EditMode::Markup);
        let mut editor = Editor {
            id: instances::allocate(),
            registered: false,
            hub,
            commands: registry,
            mode: ModeMachine::new(initial_mode),
            converter,
            markup,
            tree,
            preview,
            height: config.height.take(),
        };

        for name in &config.extensions {
            match ext::lookup(name) {
                Some(setup) => setup(&mut editor)?,
                None => return Err(EditorError::UnknownExtension(name.clone())),
            }
        }

        editor.hub.emit(
            channels::change_mode_for(initial_mode),
            &EventPayload::None,
        )?;
        editor.hub.emit(
            channels::CHANGE_MODE,
            &EventPayload::Text(initial_mode.as_str().to_string()),
        )?;
        editor.set_value(&config.initial_value)?;

        instances::insert(editor.id);
        editor.registered = true;
        tracing::debug!(id = ?editor.id, mode = %initial_mode, "editor created");
        Ok(editor)
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn mode(&self) -> EditMode {
        self.mode.current()
    }

    pub fn is_markup_mode(&self) -> bool {
        self.mode.is(EditMode::Markup)
    }

    pub fn is_tree_mode(&self) -> bool {
        self.mode.is(EditMode::Tree)
    }

    pub fn height(&self) -> Option<&str> {
        self.height.as_deref()
    }

    pub fn hub(&self) -> &EventHub {
        &self.hub
    }

    /// Replace the document content. In tree mode the markup is converted
    /// first; a conversion failure leaves the content untouched.
    pub fn set_value(&mut self, markup: &str) -> Result<(), EditorError> {
        match self.mode.current() {
            EditMode::Markup => {
                self.markup.borrow_mut().set_value(markup);
            }
            EditMode::Tree => {
                let tree = self.converter.to_tree(markup)?;
                self.tree.borrow_mut().set_value(tree);
            }
        }
        self.hub.emit(
            channels::content_changed_for(self.mode.current()),
            &EventPayload::Text(markup.to_string()),
        )?;
        Ok(())
    }

    /// The document as markup. In tree mode the tree is serialized on the
    /// way out.
    pub fn get_value(&self) -> Result<String, EditorError> {
        match self.mode.current() {
            EditMode::Markup => Ok(self.markup.borrow().value()),
            EditMode::Tree => Ok(self.converter.to_markup(&self.tree.borrow().value())?),
        }
    }

    /// Dispatch the command `name` against the active representation, then
    /// announce the content change.
    pub fn exec(&mut self, name: &str, payload: &serde_json::Value) -> Result<(), EditorError> {
        let active = self.mode.current();
        let ctx = CommandContext {
            hub: &self.hub,
            payload,
        };
        self.commands
            .exec(name, active, &self.markup, &self.tree, &ctx)?;

        let value = self.get_value()?;
        self.hub.emit(
            channels::content_changed_for(active),
            &EventPayload::Text(value),
        )?;
        Ok(())
    }

    /// Register a command after construction. Extensions use this.
    pub fn register_command(&mut self, command: Command) {
        self.commands.register(command);
    }

    /// Switch the active representation. `Ok(false)` when already in
    /// `target`.
    pub fn change_mode(&mut self, target: EditMode) -> Result<bool, EditorError> {
        self.mode.switch_to(
            target,
            SwitchContext {
                converter: self.converter.as_ref(),
                markup: &self.markup,
                tree: &self.tree,
                hub: &self.hub,
            },
        )
    }

    /// Subscribe to an event channel on this instance's hub.
    pub fn listen<F>(&self, channel: impl Into<String>, callback: F) -> ListenerHandle
    where
        F: FnMut(&EventPayload) -> ListenerResult + 'static,
    {
        self.hub.listen(channel, callback)
    }

    pub fn unlisten(&self, handle: &ListenerHandle) {
        self.hub.unlisten(handle);
    }

    /// Focus the active representation widget.
    pub fn focus(&mut self) {
        match self.mode.current() {
            EditMode::Markup => self.markup.borrow_mut().focus(),
            EditMode::Tree => self.tree.borrow_mut().focus(),
        }
    }

    /// Tear down the instance: releases both widgets and drops the editor,
    /// which removes it from the registry.
    pub fn remove(self) {
        self.markup.borrow_mut().remove();
        self.tree.borrow_mut().remove();
        tracing::debug!(id = ?self.id, "editor removed");
    }
}

impl Drop for Editor {
    fn drop(&mut self) {
        if self.registered {
            instances::unregister(self.id);
        }
    }
}
