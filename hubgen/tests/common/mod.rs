//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use hubgen::symbols::{MethodDecl, SymbolGraph, TypeDecl, TypeHandle};
use hubgen::{GenerationOutput, Generator, Options};

pub const TASK: &str = "System.Threading.Tasks.Task";
pub const GENERIC_TASK: &str = "System.Threading.Tasks.Task`1";
pub const ASYNC_ENUMERABLE: &str = "System.Collections.Generic.IAsyncEnumerable`1";
pub const CHANNEL_READER: &str = "System.Threading.Channels.ChannelReader`1";
pub const CANCELLATION_TOKEN: &str = "System.Threading.CancellationToken";

/// A program under construction: the core library plus the three markers.
pub struct Program {
    pub graph: SymbolGraph,
    pub hub: TypeHandle,
    pub receiver: TypeHandle,
    pub data: TypeHandle,
}

impl Program {
    pub fn new() -> Self {
        let mut graph = SymbolGraph::with_core_library();
        let hub = graph.declare(TypeDecl::class("TypedSignalR.Client", "HubAttribute"));
        let receiver = graph.declare(TypeDecl::class("TypedSignalR.Client", "ReceiverAttribute"));
        let data = graph.declare(TypeDecl::class("Tapper", "TranspilationSourceAttribute"));
        Self {
            graph,
            hub,
            receiver,
            data,
        }
    }

    pub fn ty(&self, metadata_name: &str) -> TypeHandle {
        self.graph
            .lookup(metadata_name)
            .unwrap_or_else(|| panic!("unknown type {metadata_name}"))
    }

    pub fn task(&self) -> TypeHandle {
        self.ty(TASK)
    }

    pub fn int(&self) -> TypeHandle {
        self.ty("System.Int32")
    }

    pub fn string(&self) -> TypeHandle {
        self.ty("System.String")
    }

    pub fn token(&self) -> TypeHandle {
        self.ty(CANCELLATION_TOKEN)
    }

    pub fn generic(&mut self, definition: &str, arguments: &[TypeHandle]) -> TypeHandle {
        self.graph.construct_named(definition, arguments).unwrap()
    }

    pub fn task_of(&mut self, ty: TypeHandle) -> TypeHandle {
        self.generic(GENERIC_TASK, &[ty])
    }

    pub fn stream_of(&mut self, ty: TypeHandle) -> TypeHandle {
        self.generic(ASYNC_ENUMERABLE, &[ty])
    }

    pub fn channel_of(&mut self, ty: TypeHandle) -> TypeHandle {
        self.generic(CHANNEL_READER, &[ty])
    }

    /// Declare a class carrying the data-type marker.
    pub fn data_type(&mut self, namespace: &str, name: &str) -> TypeHandle {
        let data = self.data;
        self.graph
            .declare(TypeDecl::class(namespace, name).with_attribute(data))
    }

    pub fn hub_interface(&mut self, namespace: &str, name: &str, methods: Vec<MethodDecl>) -> TypeHandle {
        let hub = self.hub;
        self.interface(TypeDecl::interface(namespace, name).with_attribute(hub), methods)
    }

    pub fn receiver_interface(&mut self, namespace: &str, name: &str, methods: Vec<MethodDecl>) -> TypeHandle {
        let receiver = self.receiver;
        self.interface(TypeDecl::interface(namespace, name).with_attribute(receiver), methods)
    }

    pub fn interface(&mut self, decl: TypeDecl, methods: Vec<MethodDecl>) -> TypeHandle {
        let decl = methods.into_iter().fold(decl, |decl, m| decl.with_method(m));
        self.graph.declare(decl)
    }

    pub fn generate(&self, options: Options) -> GenerationOutput {
        Generator::new(options).generate(&self.graph).unwrap()
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

/// The chat sample: one hub and one receiver sharing a `Message` type.
pub fn chat_program() -> Program {
    let mut program = Program::new();
    let task = program.task();
    let string = program.string();
    let date = program.ty("System.DateTime");
    let message = program.data_type("App.Interfaces.Chat", "Message");
    let names = program.generic("System.Collections.Generic.IEnumerable`1", &[string]);
    let participants = program.task_of(names);

    program.hub_interface(
        "App.Interfaces.Chat",
        "IChatHub",
        vec![
            MethodDecl::new("Join", task).param("username", string),
            MethodDecl::new("Leave", task),
            MethodDecl::new("GetParticipants", participants),
            MethodDecl::new("SendMessage", task).param("message", string),
        ],
    );
    program.receiver_interface(
        "App.Interfaces.Chat",
        "IChatReceiver",
        vec![
            MethodDecl::new("OnReceiveMessage", task).param("message", message),
            MethodDecl::new("OnLeave", task).param("username", string).param("dateTime", date),
            MethodDecl::new("OnJoin", task).param("username", string).param("dateTime", date),
        ],
    );

    program
}

/// Content of the unit at `path`, failing the test if it was not produced.
pub fn unit<'a>(output: &'a GenerationOutput, path: &str) -> &'a str {
    &output
        .unit(path)
        .unwrap_or_else(|| panic!("missing unit {path}"))
        .content
}
