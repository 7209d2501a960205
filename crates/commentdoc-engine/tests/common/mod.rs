#![allow(dead_code)]

use commentdoc_engine::{EntityKind, SourceEntity};

pub fn function(name: &str, qualified: &str) -> SourceEntity {
    SourceEntity::new(EntityKind::Function, name, qualified)
}

pub fn member_function(name: &str, qualified: &str) -> SourceEntity {
    SourceEntity::new(EntityKind::MemberFunction, name, qualified)
}

pub fn namespace(name: &str, qualified: &str) -> SourceEntity {
    SourceEntity::new(EntityKind::Namespace, name, qualified)
}

pub fn structure(name: &str, qualified: &str) -> SourceEntity {
    SourceEntity::new(EntityKind::Struct, name, qualified)
}

/// Target of the cross-document links below.
pub fn linking_target() -> SourceEntity {
    SourceEntity::file("documentation__linking_target.cpp")
        .with_child(function("func", "func(int)").with_comment("/// A function."))
        .with_child(function("func2", "func2(int)"))
        .with_child(
            structure("foo", "foo<T>")
                .with_comment("/// A struct.")
                .with_child(
                    SourceEntity::new(EntityKind::MemberVariable, "member", "foo<T>::member")
                        .with_comment("/// A member."),
                )
                .with_child(
                    member_function("baz", "foo<T>::baz()")
                        .with_comment("/// Doc.\n/// \\unique_name *bar()"),
                ),
        )
}

/// Long, short and relative links.
pub fn linking_source() -> SourceEntity {
    SourceEntity::file("documentation__linking.cpp")
        .with_child(function("other_func", "other_func()").with_comment("/// Another function."))
        .with_child(function("bar", "bar()").with_comment(
            "/// Documentation with links.
///
/// [other_func()]()
/// [func(int)]()
/// [func(int).a]()
/// [func2(int)]()
/// [func2(int).a]()
/// [foo<T>]()
/// [foo<T>::member]()
/// [foo<T>::bar()]()",
        ))
        .with_child(function("bar2", "bar2()").with_comment(
            "/// Documentation with short links.
///
/// [other_func]()
/// [func]()
/// [func().a]()
/// [foo]()
/// [foo::member]()
/// [foo::bar]()",
        ))
        .with_child(
            namespace("ns", "ns")
                .with_child(function("a", "ns::a()").with_comment("/// doc"))
                .with_child(
                    structure("b", "ns::b<T>")
                        .with_comment("/// doc")
                        .with_child(member_function("c", "ns::b<T>::c()").with_comment("/// doc"))
                        .with_child(member_function("bar3", "ns::b<T>::bar3()").with_comment(
                            "/// Documentation with relative links.
///
/// [*a]()
/// [?b]()
/// [*c]()",
                        )),
                ),
        )
}
