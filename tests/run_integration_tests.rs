use cosmo_lang::frontend::Parser;
use cosmo_lang::treewalk::Interpreter;

use regex::Regex;
use test_generator::test_resources;

#[derive(Debug, PartialEq)]
enum ExpectedOutput {
    ParserError(Vec<String>),
    Ran(Output),
}

#[derive(Debug, PartialEq)]
struct Output {
    output: Vec<String>,
    runtime_error: Option<String>,
}

#[test_resources("tests/cosmo_test_cases/**/*.cosmo")]
fn test_interpreter(file: &str) {
    let source = std::fs::read_to_string(file).unwrap();

    let expected_output = get_expected_output(&source);
    let output = run_interpreter_on_source(&source);

    assert_eq!(expected_output, output);
}

fn run_interpreter_on_source(source: &str) -> ExpectedOutput {
    let tree = match Parser::new(source).parse() {
        Ok(tree) => tree,
        Err(errors) => {
            let errors = errors.into_iter().map(|e| e.render(source)).collect();
            return ExpectedOutput::ParserError(errors);
        }
    };

    let mut output = vec![];
    let result = {
        let mut interpreter =
            Interpreter::new(Box::new(|line: &str| output.push(line.to_owned())));
        interpreter.eval_statements(&tree.stmts)
    };

    ExpectedOutput::Ran(Output {
        output,
        runtime_error: result.err().map(|e| e.error.to_string()),
    })
}

fn get_expected_output(source: &str) -> ExpectedOutput {
    let output_regexer = Regex::new(r"// expect: (.*)$").unwrap();
    let runtime_error_regexer = Regex::new(r"// expect runtime error: (.*)$").unwrap();
    let parser_error_regexer = Regex::new(r"// (\[line \d+\] Error.*)$").unwrap();

    let mut parser_errors = vec![];
    let mut result = Output {
        output: vec![],
        runtime_error: None,
    };

    for line in source.lines() {
        if let Some(r) = output_regexer.captures(line) {
            result.output.push(r.get(1).unwrap().as_str().to_owned());
        }
        if let Some(r) = runtime_error_regexer.captures(line) {
            result
                .runtime_error
                .replace(r.get(1).unwrap().as_str().to_owned());
        }
        if let Some(r) = parser_error_regexer.captures(line) {
            parser_errors.push(r.get(1).unwrap().as_str().to_owned());
        }
    }

    if !parser_errors.is_empty() {
        ExpectedOutput::ParserError(parser_errors)
    } else {
        ExpectedOutput::Ran(result)
    }
}
