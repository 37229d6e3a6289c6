//! Interface files.
//!
//! One file per namespace under the output directory, holding a structural
//! type for every hub and receiver interface declared in that namespace.
//! Data types are imported from the data-type transpiler's files one
//! directory up.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::info;

use crate::binding::{MappedInterface, MappedMethod, TypeImport};
use crate::config::Options;
use crate::generator::GeneratedUnit;
use crate::mapper::TransportWrapper;
use crate::writer::CodeWriter;

pub(crate) const BANNER: &str = "/* THIS (.ts) FILE IS GENERATED BY hubgen */";

/// Module file stem for a namespace. Types outside any namespace live in
/// `global`.
pub fn module_name(namespace: &str) -> &str {
    if namespace.is_empty() {
        "global"
    } else {
        namespace
    }
}

pub(crate) fn write_header(w: &mut CodeWriter) {
    w.writeln(BANNER);
    w.writeln("/* eslint-disable */");
    w.writeln("/* tslint:disable */");
}

/// Write one `import { A, B } from '<prefix><namespace>';` line per
/// namespace, in namespace order.
pub(crate) fn write_imports<'i, I>(w: &mut CodeWriter, prefix: &str, imports: I)
where
    I: IntoIterator<Item = &'i TypeImport>,
{
    let mut grouped: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for import in imports {
        grouped
            .entry(module_name(&import.namespace))
            .or_default()
            .insert(&import.name);
    }

    for (module, names) in grouped {
        let names: Vec<&str> = names.into_iter().collect();
        w.writeln(&format!(
            "import {{ {} }} from '{}{}';",
            names.join(", "),
            prefix,
            module
        ));
    }
}

pub struct InterfaceTranspiler<'a> {
    options: &'a Options,
}

impl<'a> InterfaceTranspiler<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self { options }
    }

    /// Render one unit per namespace, sorted by namespace.
    ///
    /// An interface marked as both hub and receiver is written once, from
    /// its first occurrence in `interfaces`.
    pub fn transpile(&self, interfaces: &[MappedInterface]) -> Vec<GeneratedUnit> {
        let mut seen = HashSet::new();
        let mut groups: BTreeMap<&str, Vec<&MappedInterface>> = BTreeMap::new();
        for interface in interfaces {
            if seen.insert(interface.qualified_name.as_str()) {
                groups
                    .entry(module_name(&interface.namespace))
                    .or_default()
                    .push(interface);
            }
        }

        groups
            .into_iter()
            .map(|(module, members)| {
                let path = format!("{}/{}.ts", self.options.output.directory, module);
                info!(path = %path, interfaces = members.len(), "transpiled interfaces");
                GeneratedUnit {
                    path,
                    content: self.render_module(&members),
                }
            })
            .collect()
    }

    fn render_module(&self, interfaces: &[&MappedInterface]) -> String {
        let mut w = CodeWriter::new(self.options.indent_str());
        write_header(&mut w);

        let wrappers: BTreeSet<TransportWrapper> = interfaces
            .iter()
            .flat_map(|i| i.wrappers.iter().copied())
            .collect();
        if !wrappers.is_empty() {
            let names: Vec<&str> = wrappers.iter().map(|wr| wr.identifier()).collect();
            w.writeln(&format!(
                "import {{ {} }} from '{}';",
                names.join(", "),
                self.options.output.transport_module
            ));
        }
        write_imports(&mut w, "../", interfaces.iter().copied().flat_map(|i| i.imports.iter()));
        w.blank_line();

        for interface in interfaces {
            w.block(&format!("export type {} =", interface.name), |w| {
                for method in &interface.methods {
                    self.render_member(w, method);
                }
            });
            w.blank_line();
        }

        w.finish(self.options.output.eol)
    }

    fn render_member(&self, w: &mut CodeWriter, method: &MappedMethod) {
        if self.options.output.emit_docs {
            w.writeln("/**");
            for parameter in &method.parameters {
                w.writeln(&format!(
                    "* @param {} Transpiled from {}",
                    parameter.name, parameter.display
                ));
            }
            w.writeln(&format!("* @returns Transpiled from {}", method.return_display));
            w.writeln("*/");
        }
        w.writeln(&format!(
            "{}({}): {};",
            method.local_name,
            method.parameter_list(),
            method.return_text
        ));
    }
}
