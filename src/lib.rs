pub mod codegen;
pub mod frontend;
pub mod treewalk;

use codegen::JsCompiler;
use frontend::errors::ParserError;
use frontend::grammar::Tree;
use frontend::Parser;
use treewalk::{Interpreter, RuntimeError};

use std::fmt;

/// Any failure a whole-program run can end with.
#[derive(Debug)]
pub enum Error {
    Parse(Vec<ParserError>),
    Runtime(RuntimeError),
    Json(serde_json::Error),
}

impl Error {
    /// One message per line, with source lexemes spliced in where spans allow.
    pub fn render(&self, source: &str) -> String {
        match self {
            Error::Parse(errors) => {
                let rendered: Vec<String> = errors.iter().map(|e| e.render(source)).collect();
                rendered.join("\n")
            }
            Error::Runtime(error) => error.render(source),
            Error::Json(error) => error.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(errors) => {
                for (i, error) in errors.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", error)?;
                }
                Ok(())
            }
            Error::Runtime(error) => write!(f, "{}", error),
            Error::Json(error) => write!(f, "{}", error),
        }
    }
}

impl From<Vec<ParserError>> for Error {
    fn from(errors: Vec<ParserError>) -> Self {
        Error::Parse(errors)
    }
}

impl From<RuntimeError> for Error {
    fn from(error: RuntimeError) -> Self {
        Error::Runtime(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json(error)
    }
}

pub fn parse(source: &str) -> Result<Tree, Error> {
    Parser::new(source).parse().map_err(Error::Parse)
}

/// Parses and interprets `source`, sending each `output` line to `sink`.
/// Output emitted before a runtime error stays emitted.
pub fn run_with_sink(source: &str, sink: Box<dyn FnMut(&str) + '_>) -> Result<(), Error> {
    let tree = parse(source)?;
    let mut interpreter = Interpreter::new(sink);
    interpreter.eval_statements(&tree.stmts)?;
    Ok(())
}

/// Buffered convenience wrapper: output lines joined by newlines, trailing
/// whitespace trimmed. On a runtime error, the lines emitted so far are
/// returned alongside the error.
pub fn run_to_string(source: &str) -> Result<String, (String, Error)> {
    let mut lines: Vec<String> = vec![];
    let result = run_with_sink(source, Box::new(|line: &str| lines.push(line.to_owned())));
    let output = lines.join("\n").trim_end().to_owned();
    match result {
        Ok(()) => Ok(output),
        Err(e) => Err((output, e)),
    }
}

/// Compiles `source` to JavaScript. Never emits from a broken tree.
pub fn compile_to_js(source: &str) -> Result<String, Error> {
    let tree = parse(source)?;
    Ok(JsCompiler::new().compile(&tree))
}

/// Scans `source` and returns the token stream as pretty-printed JSON
/// alongside any lexical error messages.
pub fn tokens_to_json(source: &str) -> Result<(String, Vec<String>), Error> {
    let (tokens, errors) = frontend::lexer::scan_all(source);
    let json = serde_json::to_string_pretty(&tokens)?;
    Ok((json, errors))
}

/// Parses `source` and returns the syntax tree as pretty-printed JSON.
pub fn ast_to_json(source: &str) -> Result<String, Error> {
    let tree = parse(source)?;
    Ok(serde_json::to_string_pretty(&tree)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_to_string_joins_lines() {
        let output = run_to_string("output(1); output(\"two\");").unwrap();
        assert_eq!(output, "1\ntwo");
    }

    #[test]
    fn test_run_to_string_keeps_partial_output_on_error() {
        let (output, error) = run_to_string("output(1); output(1 / 0);").unwrap_err();
        assert_eq!(output, "1");
        assert!(matches!(error, Error::Runtime(_)));
    }

    #[test]
    fn test_parse_errors_surface_before_any_run() {
        let error = run_to_string("output(;").unwrap_err().1;
        assert!(matches!(error, Error::Parse(_)));
    }

    #[test]
    fn test_compile_refuses_broken_tree() {
        assert!(matches!(compile_to_js("create = 1;"), Err(Error::Parse(_))));
        assert!(compile_to_js("output(1);").is_ok());
    }

    #[test]
    fn test_tokens_to_json_reports_lexical_errors() {
        let (json, errors) = tokens_to_json("\"unterminated").unwrap();
        // Malformed tokens are reported, not serialized.
        assert!(!json.contains("LexerError"));
        assert_eq!(errors, vec!["[line 1] Unterminated string."]);
    }

    #[test]
    fn test_ast_to_json_roundtrips_structure() {
        let json = ast_to_json("create x = 1;").unwrap();
        assert!(json.contains("VariableDecl"));
    }
}
