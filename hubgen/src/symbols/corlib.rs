//! Standard types of the host runtime, seeded into [`SymbolGraph::with_core_library`].

use super::graph::{SymbolGraph, TypeDecl};
use super::TypeKind;

struct CoreType {
    namespace: &'static str,
    name: &'static str,
    kind: TypeKind,
    arity: usize,
    keyword: Option<&'static str>,
}

const fn core(
    namespace: &'static str,
    name: &'static str,
    kind: TypeKind,
    arity: usize,
    keyword: Option<&'static str>,
) -> CoreType {
    CoreType {
        namespace,
        name,
        kind,
        arity,
        keyword,
    }
}

const SYSTEM: &str = "System";
const GENERIC: &str = "System.Collections.Generic";

const CORE_TYPES: &[CoreType] = &[
    core(SYSTEM, "Object", TypeKind::Class, 0, Some("object")),
    core(SYSTEM, "Boolean", TypeKind::Struct, 0, Some("bool")),
    core(SYSTEM, "Byte", TypeKind::Struct, 0, Some("byte")),
    core(SYSTEM, "SByte", TypeKind::Struct, 0, Some("sbyte")),
    core(SYSTEM, "Int16", TypeKind::Struct, 0, Some("short")),
    core(SYSTEM, "UInt16", TypeKind::Struct, 0, Some("ushort")),
    core(SYSTEM, "Int32", TypeKind::Struct, 0, Some("int")),
    core(SYSTEM, "UInt32", TypeKind::Struct, 0, Some("uint")),
    core(SYSTEM, "Int64", TypeKind::Struct, 0, Some("long")),
    core(SYSTEM, "UInt64", TypeKind::Struct, 0, Some("ulong")),
    core(SYSTEM, "Single", TypeKind::Struct, 0, Some("float")),
    core(SYSTEM, "Double", TypeKind::Struct, 0, Some("double")),
    core(SYSTEM, "Decimal", TypeKind::Struct, 0, Some("decimal")),
    core(SYSTEM, "Char", TypeKind::Struct, 0, Some("char")),
    core(SYSTEM, "String", TypeKind::Class, 0, Some("string")),
    core(SYSTEM, "Guid", TypeKind::Struct, 0, None),
    core(SYSTEM, "Uri", TypeKind::Class, 0, None),
    core(SYSTEM, "DateTime", TypeKind::Struct, 0, None),
    core(SYSTEM, "DateTimeOffset", TypeKind::Struct, 0, None),
    core(SYSTEM, "Nullable", TypeKind::Struct, 1, None),
    core(SYSTEM, "ArraySegment", TypeKind::Struct, 1, None),
    core(GENERIC, "List", TypeKind::Class, 1, None),
    core(GENERIC, "LinkedList", TypeKind::Class, 1, None),
    core(GENERIC, "Queue", TypeKind::Class, 1, None),
    core(GENERIC, "Stack", TypeKind::Class, 1, None),
    core(GENERIC, "HashSet", TypeKind::Class, 1, None),
    core(GENERIC, "IEnumerable", TypeKind::Interface, 1, None),
    core(GENERIC, "IReadOnlyCollection", TypeKind::Interface, 1, None),
    core(GENERIC, "IReadOnlyList", TypeKind::Interface, 1, None),
    core(GENERIC, "ICollection", TypeKind::Interface, 1, None),
    core(GENERIC, "IList", TypeKind::Interface, 1, None),
    core(GENERIC, "ISet", TypeKind::Interface, 1, None),
    core(GENERIC, "Dictionary", TypeKind::Class, 2, None),
    core(GENERIC, "IDictionary", TypeKind::Interface, 2, None),
    core(GENERIC, "IReadOnlyDictionary", TypeKind::Interface, 2, None),
    core(GENERIC, "IAsyncEnumerable", TypeKind::Interface, 1, None),
    core("System.Threading.Tasks", "Task", TypeKind::Class, 0, None),
    core("System.Threading.Tasks", "Task", TypeKind::Class, 1, None),
    core("System.Threading.Channels", "ChannelReader", TypeKind::Class, 1, None),
    core("System.Threading", "CancellationToken", TypeKind::Struct, 0, None),
];

pub(super) fn seed(graph: &mut SymbolGraph) {
    for ty in CORE_TYPES {
        let mut decl = TypeDecl::new(ty.kind, ty.namespace, ty.name)
            .with_type_parameters(ty.arity)
            .referenced();
        if let Some(keyword) = ty.keyword {
            decl = decl.with_keyword(keyword);
        }
        graph.declare(decl);
    }
}
