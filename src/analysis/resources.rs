//! Layout resource usage from compiled code
//!
//! Builds the `R.layout` id table of the application and records which
//! layout ids are passed to `setContentView(int)`, so the batch driver can
//! tell which screen layouts are actually reachable.

use crate::bytecode::{BytecodeSource, ClassInfo, InvokeExpr, MethodBody, Operand, ValueType};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

const ENTRY_METHOD: &str = "setContentView";
const INFLATE_METHOD: &str = "inflate";

/// Result of a resource-usage scan
#[derive(Debug, Default, Clone, Serialize)]
pub struct ResourceUsage {
    /// Layout resource id -> layout name
    pub layout_ids: BTreeMap<i32, String>,
    /// Ids passed to `setContentView(int)`, in visit order
    pub reachable_ids: Vec<i32>,
    /// Entry calls whose layout could not be determined
    pub unresolved_calls: usize,
}

impl ResourceUsage {
    /// Names of the reachable layouts; ids missing from the table are dropped
    pub fn valid_layout_names(&self) -> Vec<String> {
        self.reachable_ids
            .iter()
            .filter_map(|id| match self.layout_ids.get(id) {
                Some(name) => Some(name.clone()),
                None => {
                    warn!("Reachable layout id {:#x} has no R.layout entry", id);
                    None
                }
            })
            .collect()
    }
}

/// Scanner over an application's method bodies
pub struct ResourceUsageScanner {
    package_prefix: String,
    layout_class: String,
    id_class: String,
    usage: ResourceUsage,
    layout_table_loaded: bool,
}

impl ResourceUsageScanner {
    /// `package` names the generated `R` classes; `package_prefix` limits which classes are scanned
    pub fn new(package: &str, package_prefix: &str) -> Self {
        Self {
            package_prefix: package_prefix.to_string(),
            layout_class: format!("{}.R$layout", package),
            id_class: format!("{}.R$id", package),
            usage: ResourceUsage::default(),
            layout_table_loaded: false,
        }
    }

    /// Visit every application method body once
    pub fn scan(&mut self, source: &dyn BytecodeSource) {
        let prefix = self.package_prefix.clone();
        source.for_each_application_method_body(&prefix, &mut |class, body| {
            self.visit(class, body);
        });

        info!(
            "Resource scan: {} layout ids, {} entry calls, {} unresolved",
            self.usage.layout_ids.len(),
            self.usage.reachable_ids.len(),
            self.usage.unresolved_calls
        );
    }

    pub fn visit(&mut self, class: &ClassInfo, body: &MethodBody) {
        if !class.name.starts_with(&self.package_prefix) {
            return;
        }

        if class.name == self.layout_class {
            self.load_layout_table(class);
        } else if class.name == self.id_class {
            // view ids are not layouts
        } else {
            self.scan_body(class, body);
        }
    }

    fn load_layout_table(&mut self, class: &ClassInfo) {
        if self.layout_table_loaded {
            return;
        }
        self.layout_table_loaded = true;

        for (name, value) in class.int_constants() {
            self.usage.layout_ids.insert(value as i32, name.to_string());
        }
        debug!("Loaded {} layout ids from {}", self.usage.layout_ids.len(), class.name);
    }

    fn scan_body(&mut self, class: &ClassInfo, body: &MethodBody) {
        for invoke in body.invocations() {
            match invoke.method.name.as_str() {
                ENTRY_METHOD => self.record_entry_call(class, body, invoke),
                INFLATE_METHOD => {
                    debug!(
                        "{}.{}: inflate() is not tracked ({})",
                        class.name, body.name, invoke.method
                    );
                }
                _ => {}
            }
        }
    }

    fn record_entry_call(&mut self, class: &ClassInfo, body: &MethodBody, invoke: &InvokeExpr) {
        let params = &invoke.method.param_types;

        if params.len() != 1 {
            self.unresolved(class, body, invoke, "multi-argument overload");
            return;
        }
        if params[0] != ValueType::Int {
            self.unresolved(class, body, invoke, "view overload");
            return;
        }

        match invoke.args.first() {
            Some(Operand::IntConstant(id)) => {
                debug!("{}.{}: setContentView({:#x})", class.name, body.name, id);
                self.usage.reachable_ids.push(*id);
            }
            _ => self.unresolved(class, body, invoke, "non-literal argument"),
        }
    }

    fn unresolved(&mut self, class: &ClassInfo, body: &MethodBody, invoke: &InvokeExpr, why: &str) {
        self.usage.unresolved_calls += 1;
        debug!(
            "{}.{}: unresolved {} ({})",
            class.name, body.name, invoke.method, why
        );
    }

    pub fn usage(&self) -> &ResourceUsage {
        &self.usage
    }

    pub fn into_usage(self) -> ResourceUsage {
        self.usage
    }

    pub fn valid_layout_names(&self) -> Vec<String> {
        self.usage.valid_layout_names()
    }
}
