use std::sync::Arc;

use anyhow::{Result, anyhow};
use swc_common::{BytePos, FileName, Globals, SourceMap};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

pub struct ParsedJSX {
    pub module: Module,
    pub source_map: Arc<SourceMap>,
    /// Position of the first byte of the file in `source_map`.
    pub start_pos: BytePos,
}

/// Plain `.ts` files cannot contain JSX, and parsing them as TSX breaks
/// angle-bracket type assertions.
fn syntax_for(file_path: &str) -> Syntax {
    Syntax::Typescript(TsSyntax {
        tsx: !file_path.ends_with(".ts"),
        ..Default::default()
    })
}

/// Parse JSX/TSX source code string into an AST.
///
/// Accepts a shared SourceMap so files can be parsed on parallel threads.
/// Recoverable syntax errors are treated as failures: a file the parser had to
/// guess about is not safe to rewrite.
pub fn parse_jsx_source(
    code: String,
    file_path: &str,
    source_map: Arc<SourceMap>,
) -> Result<ParsedJSX> {
    use swc_common::GLOBALS;

    GLOBALS.set(&Globals::new(), || {
        let source_file = source_map.new_source_file(FileName::Real(file_path.into()).into(), code);

        let mut parser = Parser::new(
            syntax_for(file_path),
            StringInput::from(&*source_file),
            None,
        );

        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse tsx string: {:?}", e))?;

        if let Some(error) = parser.take_errors().into_iter().next() {
            return Err(anyhow!("Failed to parse tsx string: {:?}", error));
        }

        Ok(ParsedJSX {
            module,
            start_pos: source_file.start_pos,
            source_map,
        })
    })
}
