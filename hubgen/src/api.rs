//! The aggregate `index.ts`.
//!
//! Holds the shared component types, the provider lookup tables keyed by
//! interface name, one proxy factory and proxy class per hub, and one
//! binder per receiver.
//!
//! Proxy members call the transport primitive matching the method's shape:
//!
//! | Shape | Call |
//! |-------|------|
//! | unary | `await connection.invoke(wire, ..args)` |
//! | server-to-client streaming | `connection.stream(wire, ..args)` |
//! | client-to-server streaming | `await connection.send(wire, ..args)` |
//!
//! The wire name is always the declared method name.

use std::collections::{BTreeSet, HashSet};

use tracing::info;

use crate::binding::{MappedInterface, MappedMethod, TypeImport};
use crate::classify::MethodShape;
use crate::config::Options;
use crate::generator::GeneratedUnit;
use crate::mapper::TransportWrapper;
use crate::transpiler::{write_header, write_imports};
use crate::writer::CodeWriter;

/// File name of the aggregate unit inside the output directory.
pub const INDEX_FILE: &str = "index.ts";

const COMPONENTS: &str = r#"// components

export type Disposable = {
    dispose(): void;
}

export type HubProxyFactory<T> = {
    createHubProxy(connection: HubConnection): T;
}

export type ReceiverRegister<T> = {
    register(connection: HubConnection, receiver: T): Disposable;
}

type ReceiverMethod = {
    methodName: string,
    method: (...args: any[]) => void
}

class ReceiverMethodSubscription implements Disposable {

    public constructor(
        private connection: HubConnection,
        private receiverMethod: ReceiverMethod[]) {
    }

    public readonly dispose = () => {
        for (const it of this.receiverMethod) {
            this.connection.off(it.methodName, it.method);
        }
        this.receiverMethod = [];
    }
}
"#;

pub struct ApiGenerator<'a> {
    options: &'a Options,
}

impl<'a> ApiGenerator<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self { options }
    }

    pub fn generate(&self, hubs: &[MappedInterface], receivers: &[MappedInterface]) -> GeneratedUnit {
        let path = format!("{}/{}", self.options.output.directory, INDEX_FILE);
        info!(
            path = %path,
            hubs = hubs.len(),
            receivers = receivers.len(),
            "generated api"
        );

        GeneratedUnit {
            path,
            content: self.render(hubs, receivers),
        }
    }

    fn render(&self, hubs: &[MappedInterface], receivers: &[MappedInterface]) -> String {
        let mut w = CodeWriter::new(self.options.indent_str());

        write_header(&mut w);
        self.render_imports(&mut w, hubs, receivers);
        w.blank_line();
        w.blank_line();

        for line in COMPONENTS.lines() {
            self.write_template_line(&mut w, line);
        }
        w.blank_line();

        w.writeln("// API");
        w.blank_line();
        self.render_providers(&mut w, hubs, receivers);

        w.writeln("// HubProxy");
        w.blank_line();
        for hub in hubs {
            self.render_hub(&mut w, hub);
        }

        w.writeln("// Receiver");
        w.blank_line();
        for receiver in receivers {
            self.render_receiver(&mut w, receiver);
        }

        w.finish(self.options.output.eol)
    }

    /// Components are written with four-space indentation; re-indent them
    /// to the configured width.
    fn write_template_line(&self, w: &mut CodeWriter, line: &str) {
        let trimmed = line.trim_start_matches(' ');
        let depth = (line.len() - trimmed.len()) / 4;
        if trimmed.is_empty() {
            w.blank_line();
            return;
        }

        let guards: Vec<_> = (0..depth).map(|_| w.indent()).collect();
        w.writeln(trimmed);
        drop(guards);
    }

    fn render_imports(&self, w: &mut CodeWriter, hubs: &[MappedInterface], receivers: &[MappedInterface]) {
        let all = || hubs.iter().chain(receivers.iter());

        let wrappers: BTreeSet<TransportWrapper> = all().flat_map(|i| i.wrappers.iter().copied()).collect();
        let mut transport = vec!["HubConnection"];
        transport.extend(wrappers.iter().map(|wr| wr.identifier()));
        w.writeln(&format!(
            "import {{ {} }} from '{}';",
            transport.join(", "),
            self.options.output.transport_module
        ));

        let mut seen = HashSet::new();
        let interfaces: Vec<TypeImport> = all()
            .filter(|i| seen.insert(i.qualified_name.as_str()))
            .map(|i| TypeImport {
                namespace: i.namespace.clone(),
                name: i.name.clone(),
            })
            .collect();
        write_imports(w, "./", &interfaces);
        write_imports(w, "../", all().flat_map(|i| i.imports.iter()));
    }

    fn render_providers(&self, w: &mut CodeWriter, hubs: &[MappedInterface], receivers: &[MappedInterface]) {
        w.block("export type HubProxyFactoryProvider =", |w| {
            for hub in hubs {
                w.writeln(&format!(
                    "(hubType: \"{0}\"): HubProxyFactory<{0}>;",
                    hub.name
                ));
            }
        });
        w.blank_line();

        self.render_lookup(w, "getHubProxyFactory", "hubType", "HubProxyFactoryProvider", hubs, "HubProxyFactory");
        w.blank_line();

        w.block("export type ReceiverRegisterProvider =", |w| {
            for receiver in receivers {
                w.writeln(&format!(
                    "(receiverType: \"{0}\"): ReceiverRegister<{0}>;",
                    receiver.name
                ));
            }
        });
        w.blank_line();

        self.render_lookup(
            w,
            "getReceiverRegister",
            "receiverType",
            "ReceiverRegisterProvider",
            receivers,
            "Binder",
        );
        w.blank_line();
    }

    fn render_lookup(
        &self,
        w: &mut CodeWriter,
        function: &str,
        key: &str,
        provider: &str,
        interfaces: &[MappedInterface],
        suffix: &str,
    ) {
        w.writeln(&format!("export const {} = (({}: string) => {{", function, key));
        {
            let _indent = w.indent();
            for interface in interfaces {
                w.block(&format!("if({} === \"{}\")", key, interface.name), |w| {
                    w.writeln(&format!("return {}_{}.Instance;", interface.name, suffix));
                });
            }
        }
        w.writeln(&format!("}}) as {};", provider));
    }

    fn render_hub(&self, w: &mut CodeWriter, hub: &MappedInterface) {
        let name = &hub.name;

        w.block(
            &format!("class {0}_HubProxyFactory implements HubProxyFactory<{0}>", name),
            |w| {
                w.writeln(&format!("public static Instance = new {}_HubProxyFactory();", name));
                w.blank_line();
                w.writeln("private constructor() {");
                w.writeln("}");
                w.blank_line();
                w.block(
                    &format!("public readonly createHubProxy = (connection: HubConnection): {} =>", name),
                    |w| {
                        w.writeln(&format!("return new {}_HubProxy(connection);", name));
                    },
                );
            },
        );
        w.blank_line();

        w.block(&format!("class {0}_HubProxy implements {0}", name), |w| {
            w.blank_line();
            w.writeln("public constructor(private connection: HubConnection) {");
            w.writeln("}");

            for method in &hub.methods {
                w.blank_line();
                self.render_proxy_member(w, method);
            }
        });
        w.blank_line();
    }

    fn render_proxy_member(&self, w: &mut CodeWriter, method: &MappedMethod) {
        let (modifier, call) = match method.shape {
            MethodShape::Unary => ("async ", "await this.connection.invoke"),
            MethodShape::ServerToClientStreaming => ("", "this.connection.stream"),
            MethodShape::ClientToServerStreaming => ("async ", "await this.connection.send"),
        };

        let mut arguments = format!("\"{}\"", method.wire_name);
        if !method.parameters.is_empty() {
            arguments.push_str(", ");
            arguments.push_str(&method.argument_list());
        }

        w.block(
            &format!(
                "public readonly {} = {}({}): {} =>",
                method.local_name,
                modifier,
                method.parameter_list(),
                method.return_text
            ),
            |w| {
                w.writeln(&format!("return {}({});", call, arguments));
            },
        );
    }

    fn render_receiver(&self, w: &mut CodeWriter, receiver: &MappedInterface) {
        let name = &receiver.name;

        w.block(
            &format!("class {0}_Binder implements ReceiverRegister<{0}>", name),
            |w| {
                w.blank_line();
                w.writeln(&format!("public static Instance = new {}_Binder();", name));
                w.blank_line();
                w.writeln("private constructor() {");
                w.writeln("}");
                w.blank_line();
                w.block(
                    &format!(
                        "public readonly register = (connection: HubConnection, receiver: {}): Disposable =>",
                        name
                    ),
                    |w| self.render_register_body(w, receiver),
                );
            },
        );
        w.blank_line();
    }

    fn render_register_body(&self, w: &mut CodeWriter, receiver: &MappedInterface) {
        w.blank_line();
        for method in &receiver.methods {
            let handler = listener_name(method);
            if method.parameters.is_empty() {
                w.writeln(&format!(
                    "const {} = () => receiver.{}();",
                    handler, method.local_name
                ));
            } else {
                let types: Vec<&str> = method.parameters.iter().map(|p| p.text.as_str()).collect();
                w.writeln(&format!(
                    "const {} = (...args: [{}]) => receiver.{}(...args);",
                    handler,
                    types.join(", "),
                    method.local_name
                ));
            }
        }
        w.blank_line();

        for method in &receiver.methods {
            w.writeln(&format!(
                "connection.on(\"{}\", {});",
                method.wire_name,
                listener_name(method)
            ));
        }
        w.blank_line();

        w.writeln("const methodList: ReceiverMethod[] = [");
        {
            let _indent = w.indent();
            let count = receiver.methods.len();
            for (i, method) in receiver.methods.iter().enumerate() {
                let separator = if i + 1 < count { "," } else { "" };
                w.writeln(&format!(
                    "{{ methodName: \"{}\", method: {} }}{}",
                    method.wire_name,
                    listener_name(method),
                    separator
                ));
            }
        }
        w.writeln("];");
        w.blank_line();
        w.writeln("return new ReceiverMethodSubscription(connection, methodList);");
    }
}

fn listener_name(method: &MappedMethod) -> String {
    format!("__{}", method.local_name)
}
