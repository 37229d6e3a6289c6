//! Discovery of marked interfaces.
//!
//! Marked interfaces are found through the symbol model, fragments of the
//! same interface are merged by metadata name, inherited methods are
//! flattened in, and every method is classified.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::classify::{classify, InterfaceRole, MethodShape};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::naming::NamingPolicy;
use crate::special::SpecialSymbols;
use crate::symbols::{DeclarationScope, MethodHandle, Parameter, SymbolModel, TypeHandle, TypeKind};

/// A classified method of a marked interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// Local accessor name with the naming policy applied.
    pub name: String,
    /// Declared name, used verbatim on the wire.
    pub wire_name: String,
    pub handle: MethodHandle,
    /// Every declared parameter in order, cancellation tokens included.
    pub parameters: Vec<Parameter>,
    pub return_type: TypeHandle,
    pub shape: MethodShape,
    pub payload: Option<TypeHandle>,
}

/// One marked interface after fragment merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    pub name: String,
    pub namespace: String,
    pub qualified_name: String,
    pub role: InterfaceRole,
    /// Every declared fragment, in declaration order.
    pub fragments: Vec<TypeHandle>,
    pub methods: Vec<MethodDescriptor>,
}

/// Result of the discovery stage.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub hubs: Vec<InterfaceDescriptor>,
    pub receivers: Vec<InterfaceDescriptor>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Discover every hub and receiver interface in `scope`.
pub fn discover(
    model: &SymbolModel<'_>,
    special: &SpecialSymbols,
    scope: DeclarationScope,
    policy: NamingPolicy,
) -> Discovery {
    let mut discovery = Discovery::default();

    discovery.hubs = discover_role(
        model,
        special,
        scope,
        policy,
        InterfaceRole::Hub,
        &mut discovery.diagnostics,
    );
    discovery.receivers = discover_role(
        model,
        special,
        scope,
        policy,
        InterfaceRole::Receiver,
        &mut discovery.diagnostics,
    );

    debug!(
        hubs = discovery.hubs.len(),
        receivers = discovery.receivers.len(),
        "discovered marked interfaces"
    );

    discovery
}

fn discover_role(
    model: &SymbolModel<'_>,
    special: &SpecialSymbols,
    scope: DeclarationScope,
    policy: NamingPolicy,
    role: InterfaceRole,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<InterfaceDescriptor> {
    let oracle = model.oracle();
    let marker = match role {
        InterfaceRole::Hub => special.hub_attribute,
        InterfaceRole::Receiver => special.receiver_attribute,
    };

    let mut groups: Vec<Vec<TypeHandle>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for ty in model.annotated_types(scope, marker) {
        if oracle.kind(ty) != TypeKind::Interface {
            debug!(
                ty = %oracle.qualified_name(ty),
                ?role,
                "skipping marked type that is not an interface"
            );
            continue;
        }

        let key = oracle.metadata_name(ty);
        match index.get(&key) {
            Some(&slot) => {
                debug!(interface = %key, "merging partial fragment");
                groups[slot].push(ty);
            }
            None => {
                index.insert(key, groups.len());
                groups.push(vec![ty]);
            }
        }
    }

    let mut descriptors = Vec::with_capacity(groups.len());
    for fragments in groups {
        let first = fragments[0];
        let qualified_name = oracle.qualified_name(first);

        if fragments.iter().any(|f| oracle.is_generic(*f)) {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::GenericMisuse,
                &qualified_name,
                format!(
                    "{:?} marker cannot be applied to a generic interface",
                    role
                ),
            ));
            continue;
        }

        let methods = model
            .flattened_methods(&fragments)
            .into_iter()
            .map(|method| describe_method(model, special, policy, method))
            .collect();
        let methods = reject_name_collisions(&qualified_name, methods, diagnostics);

        descriptors.push(InterfaceDescriptor {
            name: oracle.name(first).to_string(),
            namespace: oracle.namespace(first).to_string(),
            qualified_name,
            role,
            fragments,
            methods,
        });
    }

    descriptors
}

/// Keep the first method for every local name; later ones are dropped with
/// a diagnostic.
fn reject_name_collisions(
    qualified_name: &str,
    methods: Vec<MethodDescriptor>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<MethodDescriptor> {
    let mut taken: HashMap<String, String> = HashMap::new();
    let mut kept = Vec::with_capacity(methods.len());

    for method in methods {
        match taken.get(&method.name) {
            Some(first) => {
                warn!(
                    interface = %qualified_name,
                    method = %method.wire_name,
                    local = %method.name,
                    "dropping method with colliding name"
                );
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::NameCollision,
                        qualified_name,
                        format!(
                            "Generated name '{}' is already used by '{}'",
                            method.name, first
                        ),
                    )
                    .with_method(&method.wire_name),
                );
            }
            None => {
                taken.insert(method.name.clone(), method.wire_name.clone());
                kept.push(method);
            }
        }
    }

    kept
}

fn describe_method(
    model: &SymbolModel<'_>,
    special: &SpecialSymbols,
    policy: NamingPolicy,
    method: MethodHandle,
) -> MethodDescriptor {
    let oracle = model.oracle();
    let wire_name = oracle.method_name(method).to_string();
    let classification = classify(model, special, method);

    MethodDescriptor {
        name: policy.method_name(&wire_name),
        wire_name,
        handle: method,
        parameters: oracle.parameters(method),
        return_type: oracle.return_type(method),
        shape: classification.shape,
        payload: classification.payload,
    }
}
