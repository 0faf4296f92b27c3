//! Tool registry: the set of callable host functions, indexed by name.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use llm_director_core::{FunctionCall, ToolSignature};

use super::{InvokeError, ToolHandler};

/// A registered handler together with its signature, captured once at
/// registration.
pub(crate) struct RegisteredTool<Ctx> {
    pub(crate) signature: ToolSignature,
    pub(crate) handler: Arc<dyn ToolHandler<Ctx>>,
}

impl<Ctx> Clone for RegisteredTool<Ctx> {
    fn clone(&self) -> Self {
        Self {
            signature: self.signature.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

/// A registry of tool handlers, indexed by name.
///
/// Generic over context type `Ctx` which is passed to tool handlers on
/// execution. Default is `()`.
///
/// A registry is built once and then shared read-only, typically behind an
/// `Arc`, by any number of concurrent runs. Calls are made through
/// [`invoke`](Self::invoke) and [`evaluate`](Self::evaluate).
pub struct ToolRegistry<Ctx = ()>
where
    Ctx: Send + Sync + 'static,
{
    pub(crate) tools: HashMap<String, RegisteredTool<Ctx>>,
}

impl<Ctx> Default for ToolRegistry<Ctx>
where
    Ctx: Send + Sync + 'static,
{
    fn default() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }
}

impl<Ctx> Clone for ToolRegistry<Ctx>
where
    Ctx: Send + Sync + 'static,
{
    /// Clones `Arc` pointers to handlers, not the handlers themselves.
    fn clone(&self) -> Self {
        Self {
            tools: self.tools.clone(),
        }
    }
}

impl<Ctx> std::fmt::Debug for ToolRegistry<Ctx>
where
    Ctx: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.tools.keys().collect();
        names.sort();
        f.debug_struct("ToolRegistry").field("tools", &names).finish()
    }
}

impl<Ctx: Send + Sync + 'static> ToolRegistry<Ctx> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool handler.
    ///
    /// If a handler with the same name already exists, it is replaced.
    pub fn register(&mut self, handler: impl ToolHandler<Ctx> + 'static) -> &mut Self {
        self.register_shared(Arc::new(handler))
    }

    /// Registers a shared tool handler.
    pub fn register_shared(&mut self, handler: Arc<dyn ToolHandler<Ctx>>) -> &mut Self {
        let signature = handler.signature();
        if signature.has_misplaced_vararg() {
            tracing::warn!(
                tool = %signature.name,
                "vararg parameter is not last; it will bind a single array argument"
            );
        }
        if self.tools.contains_key(&signature.name) {
            tracing::debug!(tool = %signature.name, "replacing existing tool registration");
        }
        self.tools.insert(
            signature.name.clone(),
            RegisteredTool { signature, handler },
        );
        self
    }

    /// Returns the handler for the given tool name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolHandler<Ctx>>> {
        self.tools.get(name).map(|t| &t.handler)
    }

    /// Returns the signature registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<&ToolSignature> {
        self.tools.get(name).map(|t| &t.signature)
    }

    /// Returns whether a tool with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Resolves a parsed call to the signature it names.
    pub fn resolve(&self, call: &FunctionCall) -> Result<&ToolSignature, InvokeError> {
        self.lookup(&call.name)
            .ok_or_else(|| InvokeError::Unresolved {
                name: call.name.clone(),
            })
    }

    /// Signatures of all registered tools, sorted by name.
    ///
    /// Pass these to the provider and to the advertisement builder.
    pub fn signatures(&self) -> Vec<ToolSignature> {
        let mut sigs: Vec<_> = self.tools.values().map(|t| t.signature.clone()).collect();
        sigs.sort_by(|a, b| a.name.cmp(&b.name));
        sigs
    }

    /// Registered tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true if no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Returns a new registry excluding the named tools.
    ///
    /// ```rust
    /// use llm_director::tool::ToolRegistry;
    ///
    /// let full: ToolRegistry<()> = ToolRegistry::new();
    /// // ... register tools ...
    /// let safe = full.without(["delete_file"]);
    /// assert!(!safe.contains("delete_file"));
    /// ```
    #[must_use]
    pub fn without<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Self {
        let exclude: HashSet<&str> = names.into_iter().collect();
        self.filtered(|name| !exclude.contains(name))
    }

    /// Returns a new registry with only the named tools.
    #[must_use]
    pub fn only<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Self {
        let include: HashSet<&str> = names.into_iter().collect();
        self.filtered(|name| include.contains(name))
    }

    fn filtered(&self, keep: impl Fn(&str) -> bool) -> Self {
        Self {
            tools: self
                .tools
                .iter()
                .filter(|(name, _)| keep(name))
                .map(|(name, tool)| (name.clone(), tool.clone()))
                .collect(),
        }
    }
}
