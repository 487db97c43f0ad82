//! Flint JIT - compile Lisp-style expressions and call them with named
//! arguments.
//!
//! ```text
//! source ──parse──► AstNode ──compile──► Program ──CodeGenerator──► Function
//!                                                                     │
//!                           named args ──► argument words ──trampoline┘
//! ```
//!
//! The code generator is pluggable. [`Interpreter`] is the built-in
//! backend; it validates bytecode once and evaluates it behind the same
//! C-ABI entry point a native backend would expose.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use flint_jit::{Jit, SymbolTypes, TokenKind, Value};
//!
//! let jit = Jit::default();
//! let mut symbols = SymbolTypes::default();
//! symbols.insert("x".to_owned(), TokenKind::Int);
//! let function = jit.compile("(* x x)", &symbols).unwrap();
//!
//! let args = HashMap::from([("x".to_owned(), Value::Int(12))]);
//! assert_eq!(function.call(&args).unwrap().as_i64(), 144);
//! ```

#![allow(
    unsafe_code,
    reason = "generated code is entered through raw handles, argument pointers and inline assembly"
)]

mod backend;
mod error;
mod function;
mod trampoline;
mod value;

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::{Arc, Once};

use flint_ir::OperatorRegistry;

pub use backend::{CodeGenerator, Interpreter, NativeEntry, NativeHandle};
pub use error::JitError;
pub use flint_ir::{SymbolTypes, TokenKind, ValueType};
pub use function::Function;
pub use value::{ReturnValue, Value};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing subscriber based on `RUST_LOG` environment variable.
///
/// Call this once at startup. Safe to call multiple times (only initializes once).
///
/// # Usage
///
/// ```bash
/// RUST_LOG=flint_ir=debug cargo test -p flint_jit
/// RUST_LOG=flint_jit=trace cargo test -p flint_jit
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}

/// Tuning knobs for compiled functions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct JitConfig {
    /// Bytes of stack reserved on top of a function's evaluation stack.
    pub frame_reserve: usize,
    /// Extra stack for backends that run on the caller's frames.
    pub interpreter_reserve: usize,
}

impl Default for JitConfig {
    fn default() -> Self {
        JitConfig {
            frame_reserve: 256,
            interpreter_reserve: 64 * 1024,
        }
    }
}

impl JitConfig {
    #[must_use]
    pub fn with_frame_reserve(mut self, bytes: usize) -> Self {
        self.frame_reserve = bytes;
        self
    }

    #[must_use]
    pub fn with_interpreter_reserve(mut self, bytes: usize) -> Self {
        self.interpreter_reserve = bytes;
        self
    }
}

/// Expression compiler bound to a code generator.
#[derive(Clone)]
pub struct Jit {
    generator: Arc<dyn CodeGenerator>,
    registry: Option<Arc<OperatorRegistry>>,
    config: JitConfig,
}

impl Default for Jit {
    fn default() -> Self {
        Jit::new(Arc::new(Interpreter::new()))
    }
}

impl Jit {
    pub fn new(generator: Arc<dyn CodeGenerator>) -> Self {
        Self::with_config(generator, JitConfig::default())
    }

    pub fn with_config(generator: Arc<dyn CodeGenerator>, config: JitConfig) -> Self {
        Jit {
            generator,
            registry: None,
            config,
        }
    }

    /// Resolve operators through `registry` instead of the built-in table.
    ///
    /// The code generator has to understand the registry's opcodes, see
    /// [`Interpreter::with_registry`].
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<OperatorRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn config(&self) -> &JitConfig {
        &self.config
    }

    /// Whether the code generator emits native code.
    pub fn is_native(&self) -> bool {
        self.generator.is_native_backend_available()
    }

    /// Parse, compile and hand `source` to the code generator.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn compile<S: BuildHasher>(
        &self,
        source: &str,
        symbols: &HashMap<String, TokenKind, S>,
    ) -> Result<Function, JitError> {
        let ast = flint_parse::parse(source)?;
        let registry = match self.registry.as_deref() {
            Some(registry) => registry,
            None => OperatorRegistry::global(),
        };
        let program = flint_ir::compile(&ast, symbols, registry)?;
        Function::new(program, Arc::clone(&self.generator), &self.config)
    }
}

impl std::fmt::Debug for Jit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Jit")
            .field("native", &self.is_native())
            .field("custom_registry", &self.registry.is_some())
            .field("config", &self.config)
            .finish()
    }
}
