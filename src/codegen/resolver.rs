use super::{BlockState, CodeBlock, NodeContext, Registry};
use tracing::warn;

/// Resolves nodes into code blocks through a registry.
///
/// Resolution never fails: every node yields exactly one block, with
/// placeholder source when no generator exists or the generator rejects the
/// node.
pub struct NodeCodeResolver<'r> {
    registry: &'r Registry,
}

impl<'r> NodeCodeResolver<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn resolve(&self, ctx: &NodeContext<'_>) -> CodeBlock {
        let node = ctx.node;
        let block = |source: String, state: BlockState, imports: Vec<String>| CodeBlock {
            node_id: node.id.clone(),
            title: node.title.clone(),
            node_type: node.node_type.clone(),
            source,
            state,
            not_implemented: state == BlockState::Idle,
            imports,
        };

        let Some(generator) = self.registry.get(&node.node_type) else {
            warn!(node = %node.id, node_type = %node.node_type, "no code generator registered");
            let source = format!(
                "# NOT IMPLEMENTED: no code generator for node type '{}'\n# Node '{}' (#{}) was left idle.\n",
                single_line(&node.node_type),
                single_line(&node.title),
                node.id
            );
            return block(source, BlockState::Idle, Vec::new());
        };

        match generator.generate(ctx) {
            Ok(code) => block(code.source, BlockState::Ok, code.imports),
            Err(e) => {
                warn!(
                    node = %node.id,
                    node_type = %node.node_type,
                    error = %e,
                    "code generation failed"
                );
                let source = format!(
                    "# ERROR: code generation failed for node '{}' (#{}, {})\n# {}\n",
                    single_line(&node.title),
                    node.id,
                    single_line(&node.node_type),
                    e
                );
                block(source, BlockState::Error, Vec::new())
            }
        }
    }
}

/// Keeps user-supplied text from breaking out of a comment line.
fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}
