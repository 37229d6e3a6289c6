//! End-to-end generation tests.
//!
//! Each test builds a program in memory, runs the generator, and checks the
//! produced interface files and `index.ts`. Whole-file layouts are pinned
//! in `snapshot_tests.rs`.

mod common;

use common::{chat_program, unit, Program};
use hubgen::config::WellKnownNames;
use hubgen::symbols::{MethodDecl, TypeDecl};
use hubgen::{
    ConfigError, ConfigManager, DiagnosticKind, GenerateError, Generator, NamingStyle, NewLine, Options,
};

// =============================================================================
// Shapes and transport calls
// =============================================================================

#[test]
fn test_unary_add_invokes_wire_name() {
    let mut program = Program::new();
    let int = program.int();
    let task_int = program.task_of(int);
    program.hub_interface(
        "App",
        "ICalculatorHub",
        vec![MethodDecl::new("Add", task_int).param("x", int).param("y", int)],
    );

    let output = program.generate(Options::default());
    assert!(!output.has_diagnostics());

    let index = unit(&output, "hubs/index.ts");
    assert!(index.contains(
        "    public readonly add = async (x: number, y: number): Promise<number> => {\n        return await this.connection.invoke(\"Add\", x, y);\n    }\n"
    ));

    let interfaces = unit(&output, "hubs/App.ts");
    assert!(interfaces.contains("    add(x: number, y: number): Promise<number>;\n"));
}

#[test]
fn test_server_stream_renders_stream_result_and_receiver_subject() {
    let mut program = Program::new();
    let task = program.task();
    let person = program.data_type("App.Models", "Person");
    let people = program.stream_of(person);

    program.hub_interface("App", "IPeopleHub", vec![MethodDecl::new("Stream", people)]);
    program.receiver_interface(
        "App",
        "IPeopleReceiver",
        vec![MethodDecl::new("OnPeople", task).param("people", people)],
    );

    let output = program.generate(Options::default().with_emit_docs(false));
    assert!(!output.has_diagnostics());

    let interfaces = unit(&output, "hubs/App.ts");
    assert!(interfaces.contains("import { IStreamResult, Subject } from '@microsoft/signalr';"));
    assert!(interfaces.contains("    stream(): IStreamResult<Person>;\n"));
    assert!(interfaces.contains("    onPeople(people: Subject<Person>): Promise<void>;\n"));

    let index = unit(&output, "hubs/index.ts");
    assert!(index.contains(
        "    public readonly stream = (): IStreamResult<Person> => {\n        return this.connection.stream(\"Stream\");\n    }\n"
    ));
}

#[test]
fn test_task_wrapped_channel_is_server_stream() {
    let mut program = Program::new();
    let int = program.int();
    let channel = program.channel_of(int);
    let wrapped = program.task_of(channel);
    program.hub_interface(
        "App",
        "ICounterHub",
        vec![MethodDecl::new("Counter", wrapped).param("count", int)],
    );

    let output = program.generate(Options::default());
    let index = unit(&output, "hubs/index.ts");
    assert!(index.contains("public readonly counter = (count: number): IStreamResult<number> => {"));
    assert!(index.contains("return this.connection.stream(\"Counter\", count);"));
}

#[test]
fn test_client_stream_sends() {
    let mut program = Program::new();
    let task = program.task();
    let int = program.int();
    let upload = program.stream_of(int);
    program.hub_interface(
        "App",
        "IUploadHub",
        vec![MethodDecl::new("Upload", task).param("values", upload)],
    );

    let output = program.generate(Options::default());
    let index = unit(&output, "hubs/index.ts");
    assert!(index.contains(
        "    public readonly upload = async (values: Subject<number>): Promise<void> => {\n        return await this.connection.send(\"Upload\", values);\n    }\n"
    ));
    assert!(index.starts_with(
        "/* THIS (.ts) FILE IS GENERATED BY hubgen */\n/* eslint-disable */\n/* tslint:disable */\nimport { HubConnection, Subject } from '@microsoft/signalr';\n"
    ));
}

#[test]
fn test_receiver_client_result_returns_promise() {
    let mut program = Program::new();
    let int = program.int();
    let task_int = program.task_of(int);
    program.receiver_interface("App", "IGuessReceiver", vec![MethodDecl::new("GetGuess", task_int)]);

    let output = program.generate(Options::default());
    assert!(!output.has_diagnostics());
    assert!(unit(&output, "hubs/App.ts").contains("    getGuess(): Promise<number>;\n"));
    assert!(unit(&output, "hubs/index.ts").contains("const __getGuess = () => receiver.getGuess();"));
}

// =============================================================================
// The chat sample
// =============================================================================

#[test]
fn test_chat_sample_units() {
    let output = chat_program().generate(Options::default());
    assert!(!output.has_diagnostics());

    let paths: Vec<&str> = output.units.iter().map(|u| u.path.as_str()).collect();
    assert_eq!(paths, vec!["hubs/App.Interfaces.Chat.ts", "hubs/index.ts"]);
}

#[test]
fn test_disposer_unsubscribes_once() {
    let output = chat_program().generate(Options::default());
    let index = unit(&output, "hubs/index.ts");

    assert!(index.contains(
        "    public readonly dispose = () => {\n        for (const it of this.receiverMethod) {\n            this.connection.off(it.methodName, it.method);\n        }\n        this.receiverMethod = [];\n    }\n"
    ));
    let listed = index.matches("{ methodName: ").count();
    let subscribed = index.matches("connection.on(").count();
    assert_eq!(listed, 3);
    assert_eq!(subscribed, listed);
}

// =============================================================================
// Determinism and naming
// =============================================================================

#[test]
fn test_generation_is_idempotent() {
    let program = chat_program();
    let first = program.generate(Options::default());
    let second = program.generate(Options::default());
    assert_eq!(first, second);
}

#[test]
fn test_naming_policy_changes_members_only() {
    let program = chat_program();
    let camel = program.generate(Options::default());
    let declared = program.generate(Options::default().with_naming_style(NamingStyle::None));

    let camel_index = unit(&camel, "hubs/index.ts");
    let declared_index = unit(&declared, "hubs/index.ts");

    assert!(camel_index.contains("public readonly join = async"));
    assert!(declared_index.contains("public readonly Join = async"));

    for wire in ["\"Join\"", "\"Leave\"", "\"GetParticipants\"", "\"OnReceiveMessage\""] {
        assert_eq!(camel_index.matches(wire).count(), declared_index.matches(wire).count());
    }
    for name in ["IChatHub_HubProxy", "IChatReceiver_Binder", "export type IChatHub"] {
        let camel_all: usize = camel.units.iter().map(|u| u.content.matches(name).count()).sum();
        let declared_all: usize = declared.units.iter().map(|u| u.content.matches(name).count()).sum();
        assert_eq!(camel_all, declared_all, "{name}");
    }
}

#[test]
fn test_method_style_overrides_naming_style() {
    let output = chat_program().generate(
        Options::default()
            .with_naming_style(NamingStyle::CamelCase)
            .with_method_style(NamingStyle::PascalCase),
    );
    assert!(unit(&output, "hubs/App.Interfaces.Chat.ts").contains("    Join(username: string): Promise<void>;\n"));
}

#[test]
fn test_naming_style_changes_only_the_leading_character() {
    let mut program = Program::new();
    let task = program.task();
    program.hub_interface(
        "App",
        "IStoreHub",
        vec![
            MethodDecl::new("GetURL", task),
            MethodDecl::new("Get_Item", task),
            MethodDecl::new("GetItem", task),
            MethodDecl::new("SendV2Message", task),
        ],
    );

    let output = program.generate(Options::default().with_emit_docs(false));
    assert!(!output.has_diagnostics());
    assert!(unit(&output, "hubs/App.ts").contains(
        "export type IStoreHub = {\n    getURL(): Promise<void>;\n    get_Item(): Promise<void>;\n    getItem(): Promise<void>;\n    sendV2Message(): Promise<void>;\n}\n"
    ));

    let index = unit(&output, "hubs/index.ts");
    assert!(index.contains("public readonly get_Item = async (): Promise<void> => {"));
    assert!(index.contains("return await this.connection.invoke(\"Get_Item\");"));
}

#[test]
fn test_colliding_local_names_are_reported() {
    let mut program = Program::new();
    let task = program.task();
    program.hub_interface(
        "App",
        "IStoreHub",
        vec![MethodDecl::new("GetItem", task), MethodDecl::new("getItem", task)],
    );

    let output = program.generate(Options::default().with_emit_docs(false));
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].kind, DiagnosticKind::NameCollision);
    assert_eq!(output.diagnostics[0].method.as_deref(), Some("getItem"));

    assert_eq!(unit(&output, "hubs/App.ts").matches("getItem(): Promise<void>;").count(), 1);
    let index = unit(&output, "hubs/index.ts");
    assert_eq!(index.matches("public readonly getItem = ").count(), 1);
    assert!(index.contains("this.connection.invoke(\"GetItem\")"));
    assert!(!index.contains("this.connection.invoke(\"getItem\")"));

    let declared = program.generate(Options::default().with_naming_style(NamingStyle::None));
    assert!(!declared.has_diagnostics());
}

#[test]
fn test_derived_method_hides_inherited_one() {
    let mut program = Program::new();
    let task = program.task();
    let int = program.int();
    let base = program.interface(
        TypeDecl::interface("App", "IPresenceHub"),
        vec![MethodDecl::new("Ping", task)],
    );
    let hub = program.hub;
    program.interface(
        TypeDecl::interface("App", "IChatHub").with_attribute(hub).with_base(base),
        vec![MethodDecl::new("Ping", task).param("id", int)],
    );

    let output = program.generate(Options::default().with_emit_docs(false));
    assert!(!output.has_diagnostics());
    assert!(unit(&output, "hubs/App.ts").contains(
        "export type IChatHub = {\n    ping(id: number): Promise<void>;\n}\n"
    ));
}

#[test]
fn test_crlf_applies_to_every_unit() {
    let output = chat_program().generate(Options::default().with_eol(NewLine::CrLf));
    for unit in &output.units {
        let stripped = unit.content.replace("\r\n", "");
        assert!(!stripped.contains('\n'), "{}", unit.path);
        assert!(unit.content.ends_with("\r\n"), "{}", unit.path);
    }
}

// =============================================================================
// Imports
// =============================================================================

#[test]
fn test_shared_data_type_imported_once_per_namespace() {
    let mut program = Program::new();
    let task = program.task();
    let person = program.data_type("App.Models", "Person");
    let people = program.generic("System.Collections.Generic.List`1", &[person]);
    let found = program.task_of(person);
    let string = program.string();

    program.hub_interface(
        "App.Chat",
        "IChatHub",
        vec![
            MethodDecl::new("Greet", task).param("person", person),
            MethodDecl::new("GreetAll", task).param("people", people),
        ],
    );
    program.hub_interface(
        "App.Chat",
        "IDirectoryHub",
        vec![MethodDecl::new("Find", found).param("name", string)],
    );
    program.hub_interface(
        "App.Game",
        "IGameHub",
        vec![MethodDecl::new("Join", task).param("player", person)],
    );

    let output = program.generate(Options::default());
    let import = "import { Person } from '../App.Models';";

    assert_eq!(unit(&output, "hubs/App.Chat.ts").matches(import).count(), 1);
    assert_eq!(unit(&output, "hubs/App.Game.ts").matches(import).count(), 1);
    assert_eq!(unit(&output, "hubs/index.ts").matches(import).count(), 1);
}

#[test]
fn test_imports_grouped_by_namespace() {
    let mut program = Program::new();
    let task = program.task();
    let user = program.data_type("App.Users", "User");
    let message = program.data_type("App.Models", "Message");
    let attachment = program.data_type("App.Models", "Attachment");

    program.hub_interface(
        "App.Chat",
        "IChatHub",
        vec![MethodDecl::new("Send", task)
            .param("from", user)
            .param("message", message)
            .param("attachment", attachment)],
    );

    let output = program.generate(Options::default());
    let interfaces = unit(&output, "hubs/App.Chat.ts");
    assert!(interfaces.contains(
        "import { Attachment, Message } from '../App.Models';\nimport { User } from '../App.Users';\n"
    ));
}

// =============================================================================
// Discovery
// =============================================================================

#[test]
fn test_partial_interface_merges() {
    let mut program = Program::new();
    let task = program.task();
    program.hub_interface("App", "IChatHub", vec![MethodDecl::new("Join", task)]);
    program.interface(
        TypeDecl::interface("App", "IChatHub"),
        vec![MethodDecl::new("Leave", task), MethodDecl::new("Kick", task)],
    );

    let output = program.generate(Options::default().with_emit_docs(false));
    let interfaces = unit(&output, "hubs/App.ts");
    assert_eq!(interfaces.matches("export type IChatHub").count(), 1);
    assert!(interfaces.contains(
        "export type IChatHub = {\n    join(): Promise<void>;\n    leave(): Promise<void>;\n    kick(): Promise<void>;\n}\n"
    ));
    assert_eq!(unit(&output, "hubs/index.ts").matches("class IChatHub_HubProxy ").count(), 1);
}

#[test]
fn test_inherited_methods_are_flattened() {
    let mut program = Program::new();
    let task = program.task();
    let base = program.interface(
        TypeDecl::interface("App", "IPresenceHub"),
        vec![MethodDecl::new("Ping", task)],
    );
    let hub = program.hub;
    program.interface(
        TypeDecl::interface("App", "IChatHub").with_attribute(hub).with_base(base),
        vec![MethodDecl::new("Join", task)],
    );

    let output = program.generate(Options::default());
    let index = unit(&output, "hubs/index.ts");
    assert!(index.contains("this.connection.invoke(\"Join\")"));
    assert!(index.contains("this.connection.invoke(\"Ping\")"));
    assert!(!index.contains("IPresenceHub"));
}

#[test]
fn test_referenced_modules_are_opt_in() {
    let mut program = Program::new();
    let task = program.task();
    let hub = program.hub;
    program.interface(
        TypeDecl::interface("Shared", "IStatusHub").with_attribute(hub).referenced(),
        vec![MethodDecl::new("Ping", task)],
    );

    let narrow = program.generate(Options::default());
    assert!(narrow.unit("hubs/Shared.ts").is_none());

    let wide = program.generate(Options::default().with_include_referenced_modules(true));
    assert!(wide.unit("hubs/Shared.ts").is_some());
}

// =============================================================================
// Cancellation tokens
// =============================================================================

#[test]
fn test_cancellation_tokens_never_emitted() {
    let mut program = Program::new();
    let task = program.task();
    let int = program.int();
    let token = program.token();
    let task_int = program.task_of(int);
    let stream = program.stream_of(int);

    program.hub_interface(
        "App",
        "IWorkHub",
        vec![
            MethodDecl::new("Compute", task_int).param("input", int).param("token", token),
            MethodDecl::new("Watch", stream).param("from", int).param("token", token),
            MethodDecl::new("Upload", task).param("values", stream).param("token", token),
        ],
    );
    program.receiver_interface(
        "App",
        "IWorkReceiver",
        vec![MethodDecl::new("OnDone", task).param("result", int).param("token", token)],
    );

    let output = program.generate(Options::default());
    assert!(!output.has_diagnostics());

    for unit in &output.units {
        assert!(!unit.content.contains("token"), "{}", unit.path);
        assert!(!unit.content.contains("CancellationToken"), "{}", unit.path);
    }

    let index = unit(&output, "hubs/index.ts");
    assert!(index.contains("return await this.connection.invoke(\"Compute\", input);"));
    assert!(index.contains("return this.connection.stream(\"Watch\", from);"));
    assert!(index.contains("return await this.connection.send(\"Upload\", values);"));
    assert!(index.contains("const __onDone = (...args: [number]) => receiver.onDone(...args);"));
}

// =============================================================================
// Diagnostics and errors
// =============================================================================

#[test]
fn test_unsupported_type_drops_member_and_keeps_interface() {
    let mut program = Program::new();
    let task = program.task();
    let opaque = program.graph.declare(TypeDecl::structure("App.Native", "Handle"));
    program.hub_interface(
        "App",
        "IChatHub",
        vec![
            MethodDecl::new("Attach", task).param("handle", opaque),
            MethodDecl::new("Leave", task),
        ],
    );

    let output = program.generate(Options::default());
    assert_eq!(output.diagnostics.len(), 1);

    let diagnostic = &output.diagnostics[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::UnsupportedType);
    assert_eq!(diagnostic.to_string(), "HG001 App.IChatHub.Attach(handle): Unsupported type 'App.Native.Handle'");

    let index = unit(&output, "hubs/index.ts");
    assert!(!index.contains("\"Attach\""));
    assert!(index.contains("\"Leave\""));
}

#[test]
fn test_generic_interface_is_skipped_with_diagnostic() {
    let mut program = Program::new();
    let task = program.task();
    let hub = program.hub;
    program.interface(
        TypeDecl::interface("App", "IRepositoryHub")
            .with_attribute(hub)
            .with_type_parameters(1),
        vec![MethodDecl::new("Clear", task)],
    );
    program.hub_interface("App", "IChatHub", vec![MethodDecl::new("Leave", task)]);

    let output = program.generate(Options::default());
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].kind, DiagnosticKind::GenericMisuse);
    assert!(!unit(&output, "hubs/index.ts").contains("IRepositoryHub"));
    assert!(unit(&output, "hubs/index.ts").contains("IChatHub"));
}

#[test]
fn test_absent_stream_types_never_match() {
    let mut program = Program::new();
    let int = program.int();
    let task = program.task();
    let stream = program.stream_of(int);
    program.hub_interface(
        "App",
        "IFeedHub",
        vec![MethodDecl::new("Feed", stream), MethodDecl::new("Leave", task)],
    );

    let mut options = Options::default();
    options.symbols = WellKnownNames {
        async_enumerable: "Missing.AsyncEnumerable`1".to_string(),
        channel_reader: "Missing.ChannelReader`1".to_string(),
        ..WellKnownNames::default()
    };

    let output = program.generate(options);
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].kind, DiagnosticKind::ShapeViolation);
    assert_eq!(output.diagnostics[0].method.as_deref(), Some("Feed"));
    assert!(unit(&output, "hubs/index.ts").contains("\"Leave\""));
}

#[test]
fn test_missing_marker_is_fatal() {
    let mut options = Options::default();
    options.symbols.transpilation_source_attribute = "Missing.Attribute".to_string();

    let err = Generator::new(options).generate(&chat_program().graph).unwrap_err();
    assert!(matches!(
        err,
        GenerateError::Config(ConfigError::MissingMarker { ref metadata_name }) if metadata_name == "Missing.Attribute"
    ));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_options_from_toml() {
    let options = ConfigManager::from_toml_str(
        r#"
[output]
directory = "generated"
indent = 2
emit_docs = false

[naming]
naming_style = "none"

[transpile.type_overrides]
"System.Guid" = "Uuid"
"#,
    )
    .unwrap();

    let mut program = Program::new();
    let task = program.task();
    let guid = program.ty("System.Guid");
    program.hub_interface("App", "ISessionHub", vec![MethodDecl::new("Resume", task).param("id", guid)]);

    let output = program.generate(options);
    let interfaces = unit(&output, "generated/App.ts");
    assert_eq!(
        interfaces,
        "/* THIS (.ts) FILE IS GENERATED BY hubgen */\n/* eslint-disable */\n/* tslint:disable */\n\nexport type ISessionHub = {\n  Resume(id: Uuid): Promise<void>;\n}\n\n"
    );
    assert!(output.unit("generated/index.ts").is_some());
}
