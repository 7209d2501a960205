// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use commentdoc_engine::{DocumentInput, EntityKind, SourceEntity};

#[allow(dead_code)]
pub fn generate_comment(links: usize) -> String {
    let mut comment = String::from("/// Brief description of the entity.\n///\n/// Longer details paragraph.\n");
    for i in 0..links {
        comment.push_str(&format!("/// See [ns{}::f{}()]() and [f{}]().\n", i % 7, i, i));
    }
    comment.push_str("/// \\effects Does things.\n/// \\notes Some notes.");
    comment
}

/// `documents` files, each with `functions` documented functions in a few namespaces.
#[allow(dead_code)]
pub fn generate_inputs(documents: usize, functions: usize) -> Vec<DocumentInput> {
    (0..documents)
        .map(|doc| {
            let mut file = SourceEntity::file(format!("file{doc}.hpp"));
            for ns in 0..7 {
                let mut namespace =
                    SourceEntity::new(EntityKind::Namespace, format!("ns{ns}"), format!("d{doc}::ns{ns}"));
                for f in (0..functions).filter(|f| f % 7 == ns) {
                    namespace.add_child(
                        SourceEntity::new(
                            EntityKind::Function,
                            format!("f{f}"),
                            format!("d{doc}::ns{ns}::f{f}()"),
                        )
                        .with_comment(generate_comment(3)),
                    );
                }
                file.add_child(namespace);
            }
            DocumentInput::new(format!("doc{doc}"), file)
        })
        .collect()
}
