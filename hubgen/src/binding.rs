//! Rendering of discovered interfaces into target type text.
//!
//! Each method is validated against its interface role and every
//! parameter and return type is run through the mapper chain. A method that
//! fails either step is dropped from its interface and reported as a
//! [`Diagnostic`]; the rest of the interface is kept.

use std::collections::BTreeSet;

use tracing::warn;

use crate::classify::{shape_violation, Classification, InterfaceRole, MethodShape};
use crate::descriptor::{InterfaceDescriptor, MethodDescriptor};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::mapper::{MapperChain, Position, TransportWrapper, TypeReferences};
use crate::special::SpecialSymbols;
use crate::symbols::{SymbolModel, TypeHandle};

/// A data type the rendered text refers to by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeImport {
    pub namespace: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedParameter {
    pub name: String,
    /// Rendered target type.
    pub text: String,
    /// Source type as the host language displays it.
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedMethod {
    pub local_name: String,
    pub wire_name: String,
    pub shape: MethodShape,
    /// Parameters in declaration order, cancellation tokens removed.
    pub parameters: Vec<MappedParameter>,
    pub return_text: String,
    pub return_display: String,
}

impl MappedMethod {
    /// `name: type` pairs joined for a signature.
    pub fn parameter_list(&self) -> String {
        self.parameters
            .iter()
            .map(|p| format!("{}: {}", p.name, p.text))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Parameter names joined for a call site.
    pub fn argument_list(&self) -> String {
        self.parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// An interface whose surviving members are fully rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedInterface {
    pub name: String,
    pub namespace: String,
    pub qualified_name: String,
    pub role: InterfaceRole,
    pub methods: Vec<MappedMethod>,
    /// Transport wrappers used by any member.
    pub wrappers: BTreeSet<TransportWrapper>,
    /// Data types used by any member.
    pub imports: BTreeSet<TypeImport>,
}

/// Maps descriptors through a mapper chain.
pub struct Binder<'a, 'o> {
    model: &'a SymbolModel<'o>,
    special: &'a SpecialSymbols,
    chain: &'a MapperChain,
}

impl<'a, 'o> Binder<'a, 'o> {
    pub fn new(model: &'a SymbolModel<'o>, special: &'a SpecialSymbols, chain: &'a MapperChain) -> Self {
        Self {
            model,
            special,
            chain,
        }
    }

    /// Render an interface, appending a diagnostic for every dropped member.
    pub fn bind(&self, interface: &InterfaceDescriptor, diagnostics: &mut Vec<Diagnostic>) -> MappedInterface {
        let mut references = TypeReferences::default();
        let mut methods = Vec::with_capacity(interface.methods.len());

        for method in &interface.methods {
            match self.bind_method(interface, method, &mut references) {
                Ok(mapped) => methods.push(mapped),
                Err(diagnostic) => {
                    warn!(%diagnostic, "dropping method");
                    diagnostics.push(diagnostic);
                }
            }
        }

        MappedInterface {
            name: interface.name.clone(),
            namespace: interface.namespace.clone(),
            qualified_name: interface.qualified_name.clone(),
            role: interface.role,
            methods,
            wrappers: references.wrappers,
            imports: self.imports(&references.data_types),
        }
    }

    fn bind_method(
        &self,
        interface: &InterfaceDescriptor,
        method: &MethodDescriptor,
        references: &mut TypeReferences,
    ) -> Result<MappedMethod, Diagnostic> {
        let oracle = self.model.oracle();
        let classification = Classification {
            shape: method.shape,
            payload: method.payload,
        };

        if let Some(message) = shape_violation(
            self.model,
            self.special,
            interface.role,
            method.handle,
            &classification,
        ) {
            return Err(
                Diagnostic::new(DiagnosticKind::ShapeViolation, &interface.qualified_name, message)
                    .with_method(&method.wire_name),
            );
        }

        // Both mappings must succeed before anything is recorded.
        let mut method_references = TypeReferences::default();
        let mut parameters = Vec::with_capacity(method.parameters.len());

        for parameter in &method.parameters {
            if self.special.is_cancellation_token(parameter.ty) {
                continue;
            }

            let mapped = self
                .chain
                .map_type(self.model, self.special, parameter.ty, Position::Argument)
                .map_err(|err| {
                    Diagnostic::new(
                        DiagnosticKind::UnsupportedType,
                        &interface.qualified_name,
                        err.to_string(),
                    )
                    .with_method(&method.wire_name)
                    .with_parameter(&parameter.name)
                })?;

            method_references.extend(mapped.references);
            parameters.push(MappedParameter {
                name: parameter.name.clone(),
                text: mapped.text,
                display: oracle.display_string(parameter.ty),
            });
        }

        let position = match interface.role {
            InterfaceRole::Hub => Position::HubReturn,
            InterfaceRole::Receiver => Position::ReceiverReturn,
        };
        let returned = self
            .chain
            .map_type(self.model, self.special, method.return_type, position)
            .map_err(|err| {
                Diagnostic::new(
                    DiagnosticKind::UnsupportedType,
                    &interface.qualified_name,
                    err.to_string(),
                )
                .with_method(&method.wire_name)
            })?;
        method_references.extend(returned.references);

        references.extend(method_references);

        Ok(MappedMethod {
            local_name: method.name.clone(),
            wire_name: method.wire_name.clone(),
            shape: method.shape,
            parameters,
            return_text: returned.text,
            return_display: oracle.display_string(method.return_type),
        })
    }

    fn imports(&self, data_types: &BTreeSet<TypeHandle>) -> BTreeSet<TypeImport> {
        let oracle = self.model.oracle();
        data_types
            .iter()
            .map(|ty| TypeImport {
                namespace: oracle.namespace(*ty).to_string(),
                name: oracle.name(*ty).to_string(),
            })
            .collect()
    }
}
