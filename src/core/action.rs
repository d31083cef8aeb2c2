//! Lifecycle callbacks bound to states and transition labels.

use super::CallbackError;
use crate::expr::{ExprError, Scope, Script};
use std::fmt;

type Callback<C> = Box<dyn Fn(&mut C) -> Result<(), CallbackError> + Send + Sync>;

enum Effect<C> {
    Script(Script),
    Callback { name: Option<String>, run: Callback<C> },
}

/// Side effect run on entry, exit, dwell or transition.
///
/// Actions receive the caller context mutably. A textual action is a
/// `;`-separated script whose assignments write back into the context.
///
/// # Example
///
/// ```rust
/// use guardfsm::core::Action;
/// use guardfsm::expr::{Value, Variables};
///
/// let tick: Action<Variables> = Action::script("a = a + 1").unwrap();
/// let mut vars = Variables::new().with("a", 1);
/// tick.run(&mut vars).unwrap();
/// assert_eq!(vars.get("a"), Some(Value::Int(2)));
/// ```
pub struct Action<C> {
    effect: Effect<C>,
}

impl<C> Action<C> {
    /// Wrap an infallible callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        Self::try_new(move |ctx: &mut C| {
            callback(ctx);
            Ok::<_, CallbackError>(())
        })
    }

    /// Create an action from a callback that may fail.
    pub fn try_new<F, E>(callback: F) -> Self
    where
        F: Fn(&mut C) -> Result<(), E> + Send + Sync + 'static,
        E: Into<CallbackError>,
    {
        Action {
            effect: Effect::Callback {
                name: None,
                run: Box::new(move |ctx| callback(ctx).map_err(Into::into)),
            },
        }
    }

    /// Parse an assignment script such as `n = n + 1; seen = true`.
    pub fn script(source: &str) -> Result<Self, ExprError> {
        Ok(Action {
            effect: Effect::Script(Script::parse(source)?),
        })
    }

    /// Attach a name used when describing a callback.
    pub fn named(mut self, label: impl Into<String>) -> Self {
        if let Effect::Callback { name, .. } = &mut self.effect {
            *name = Some(label.into());
        }
        self
    }

    /// Script text, `name()` for named callbacks, or `<callback>`.
    pub fn describe(&self) -> String {
        match &self.effect {
            Effect::Script(script) => script.source().to_string(),
            Effect::Callback { name: Some(n), .. } => format!("{n}()"),
            Effect::Callback { name: None, .. } => "<callback>".to_string(),
        }
    }
}

impl<C: Scope> Action<C> {
    /// Run the action against the context.
    pub fn run(&self, ctx: &mut C) -> Result<(), CallbackError> {
        match &self.effect {
            Effect::Script(script) => Ok(script.execute(ctx)?),
            Effect::Callback { run, .. } => run(ctx),
        }
    }
}

impl<C> fmt::Debug for Action<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Action").field(&self.describe()).finish()
    }
}
