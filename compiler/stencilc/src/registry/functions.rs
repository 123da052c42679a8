//! Template functions and the function registry.

use rustc_hash::FxHashMap;
use stencil_ir::FunctionId;

use super::RegistryError;

/// How a resolved call is emitted.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Invocation {
    /// Direct call of a Rust path taking `&[Value]`.
    Simple { target: String },
    /// A method on a runtime extension, looked up by name at render time.
    Method { extension: String, method: String },
    /// A host closure bound on the runtime environment under `binding`.
    Callback { binding: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TemplateFunction {
    pub name: String,
    pub invocation: Invocation,
    /// Output is already escaped; `print` writes it as is.
    pub is_safe: bool,
}

impl TemplateFunction {
    pub fn simple(name: &str, target: &str) -> Self {
        TemplateFunction {
            name: name.to_string(),
            invocation: Invocation::Simple {
                target: target.to_string(),
            },
            is_safe: false,
        }
    }

    pub fn method(name: &str, extension: &str, method: &str) -> Self {
        TemplateFunction {
            name: name.to_string(),
            invocation: Invocation::Method {
                extension: extension.to_string(),
                method: method.to_string(),
            },
            is_safe: false,
        }
    }

    pub fn callback(name: &str, binding: &str) -> Self {
        TemplateFunction {
            name: name.to_string(),
            invocation: Invocation::Callback {
                binding: binding.to_string(),
            },
            is_safe: false,
        }
    }

    #[must_use]
    pub fn safe(mut self) -> Self {
        self.is_safe = true;
        self
    }
}

#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: Vec<TemplateFunction>,
    by_name: FxHashMap<String, FunctionId>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, function: TemplateFunction) -> Result<FunctionId, RegistryError> {
        if self.by_name.contains_key(&function.name) {
            return Err(RegistryError::duplicate_function(&function.name));
        }
        let id = FunctionId::new(u32::try_from(self.functions.len()).unwrap_or(u32::MAX));
        self.by_name.insert(function.name.clone(), id);
        self.functions.push(function);
        Ok(id)
    }

    pub fn lookup(&self, name: &str) -> Option<FunctionId> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn get(&self, id: FunctionId) -> &TemplateFunction {
        &self.functions[id.index()]
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
