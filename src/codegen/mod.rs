//! Source-to-source compilation of Cosmo programs into JavaScript.
//!
//! The emitter walks the same syntax tree the interpreter does but is
//! otherwise independent of it. Standard library calls are inlined into
//! native JavaScript expressions, which bypasses the interpreter's runtime
//! argument checks; the generated code relies on JavaScript's own coercions
//! instead.

use crate::frontend::grammar::{
    Expr, ExprType, InfixOperator, Literal, LogicalOperator, PrefixOperator, Stmt, StmtType, Tree,
};

const BANNER: &str = "/**\n * Generated by the Cosmo compiler.\n **/\n\n'use strict';\n\n";

pub struct JsCompiler {
    indent_level: usize,
}

impl JsCompiler {
    pub fn new() -> Self {
        JsCompiler { indent_level: 0 }
    }

    pub fn compile(&mut self, tree: &Tree) -> String {
        self.indent_level = 0;
        let mut output = String::from(BANNER);
        for stmt in tree.stmts.iter() {
            output.push_str(&self.gen_stmt(stmt));
        }
        output
    }

    fn indent(&self) -> String {
        "  ".repeat(self.indent_level)
    }

    /// Emits one statement at the current indentation, newline-terminated.
    fn gen_stmt(&mut self, stmt: &Stmt) -> String {
        let code = match &stmt.stmt {
            StmtType::Expression(expr) => format!("{};\n", self.gen_expr(expr)),
            StmtType::Output(expr) => format!("console.log({});\n", self.gen_expr(expr)),
            StmtType::VariableDecl(ident, initializer) => {
                let init_code = match initializer {
                    Some(expr) => self.gen_expr(expr),
                    None => "null".to_owned(),
                };
                format!("let {} = {};\n", ident.name, init_code)
            }
            StmtType::Block(stmts) => self.gen_block(stmts),
            StmtType::IfElse(condition, if_body, else_body) => {
                let condition_code = self.gen_expr(condition);
                let if_code = self.gen_braced_stmt(if_body);
                match else_body {
                    Some(else_body) => {
                        let else_code = self.gen_braced_stmt(else_body);
                        format!(
                            "if ({}){} else{}",
                            condition_code,
                            if_code.trim_end(),
                            else_code
                        )
                    }
                    None => format!("if ({}){}", condition_code, if_code),
                }
            }
            StmtType::While(condition, body) => {
                let condition_code = self.gen_expr(condition);
                format!("while ({}){}", condition_code, self.gen_braced_stmt(body))
            }
            StmtType::FuncDecl(func_info) => {
                let params: Vec<&str> = func_info.params.iter().map(|p| p.name.as_str()).collect();
                let mut body = String::from("{\n");
                self.indent_level += 1;
                for body_stmt in func_info.body.iter() {
                    body.push_str(&self.indent());
                    body.push_str(&self.gen_stmt(body_stmt));
                }
                self.indent_level -= 1;
                body.push_str(&self.indent());
                body.push('}');
                format!(
                    "function {}({}) {}\n",
                    func_info.ident.name,
                    params.join(", "),
                    body
                )
            }
            StmtType::Return(expr) => match expr {
                Some(expr) => format!("return {};\n", self.gen_expr(expr)),
                None => "return;\n".to_owned(),
            },
        };
        code
    }

    fn gen_block(&mut self, stmts: &[Stmt]) -> String {
        let mut code = String::from("{\n");
        self.indent_level += 1;
        for stmt in stmts.iter() {
            code.push_str(&self.indent());
            code.push_str(&self.gen_stmt(stmt));
        }
        self.indent_level -= 1;
        code.push_str(&self.indent());
        code.push_str("}\n");
        code
    }

    /// Control-flow bodies always get braces, even for a single statement.
    fn gen_braced_stmt(&mut self, stmt: &Stmt) -> String {
        if let StmtType::Block(stmts) = &stmt.stmt {
            return format!(" {}", self.gen_block(stmts));
        }
        let mut code = String::from(" {\n");
        self.indent_level += 1;
        code.push_str(&self.indent());
        code.push_str(&self.gen_stmt(stmt));
        self.indent_level -= 1;
        code.push_str(&self.indent());
        code.push_str("}\n");
        code
    }

    fn gen_expr(&mut self, expr: &Expr) -> String {
        match &expr.expr {
            ExprType::Literal(l) => gen_literal(l),
            ExprType::Infix(op, lhs, rhs) => {
                // Parenthesized so JavaScript precedence can never disagree
                // with the parsed shape.
                format!(
                    "({} {} {})",
                    self.gen_expr(lhs),
                    infix_symbol(*op),
                    self.gen_expr(rhs)
                )
            }
            ExprType::Prefix(op, operand) => {
                let symbol = match op {
                    PrefixOperator::Negate => "-",
                    PrefixOperator::LogicalNot => "!",
                };
                format!("{}({})", symbol, self.gen_expr(operand))
            }
            ExprType::Logical(op, lhs, rhs) => {
                let symbol = match op {
                    LogicalOperator::And => "&&",
                    LogicalOperator::Or => "||",
                };
                format!("({} {} {})", self.gen_expr(lhs), symbol, self.gen_expr(rhs))
            }
            ExprType::Variable(var) => var.name.clone(),
            ExprType::Assignment(var, value) => {
                format!("({} = {})", var.name, self.gen_expr(value))
            }
            ExprType::Call(callee, args) => self.gen_call(callee, args),
            ExprType::Grouping(inner) => format!("({})", self.gen_expr(inner)),
        }
    }

    fn gen_call(&mut self, callee: &Expr, args: &[Expr]) -> String {
        let arg_codes: Vec<String> = args.iter().map(|a| self.gen_expr(a)).collect();

        // Standard library calls on a bare name lower to native JavaScript.
        // Calls with the wrong argument count fall through to a plain call,
        // which fails at JavaScript runtime the same way any bad call would.
        if let ExprType::Variable(var) = &callee.expr {
            match (var.name.as_str(), arg_codes.as_slice()) {
                ("add", codes) if !codes.is_empty() => {
                    return format!("({})", codes.join(" + "));
                }
                ("sqrt", [arg]) => return format!("Math.sqrt({})", arg),
                ("clock", []) => return "(Date.now() / 1000.0)".to_owned(),
                ("random", []) => return "Math.random()".to_owned(),
                ("abs", [arg]) => return format!("Math.abs({})", arg),
                ("substring", [target, start, end]) => {
                    return format!("{}.substring({}, {})", target, start, end);
                }
                ("length", [arg]) => return format!("{}.length", arg),
                ("typeof", [arg]) => return format!("typeof {}", arg),
                _ => {}
            }
        }

        format!("{}({})", self.gen_expr(callee), arg_codes.join(", "))
    }
}

impl Default for JsCompiler {
    fn default() -> Self {
        JsCompiler::new()
    }
}

fn gen_literal(l: &Literal) -> String {
    match l {
        Literal::Number(n) => n.to_string(),
        Literal::Boolean(b) => b.to_string(),
        // serde_json handles quote and backslash escaping.
        Literal::Str(s) => {
            serde_json::to_string(s).expect("string serialization cannot fail")
        }
        Literal::Null => "null".to_owned(),
    }
}

fn infix_symbol(op: InfixOperator) -> &'static str {
    match op {
        InfixOperator::Add => "+",
        InfixOperator::Subtract => "-",
        InfixOperator::Multiply => "*",
        InfixOperator::Divide => "/",
        InfixOperator::Modulo => "%",
        // Strict equality in the generated code.
        InfixOperator::EqualTo => "===",
        InfixOperator::NotEqualTo => "!==",
        InfixOperator::GreaterThan => ">",
        InfixOperator::GreaterEq => ">=",
        InfixOperator::LessThan => "<",
        InfixOperator::LessEq => "<=",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::Parser;

    fn compile(source: &str) -> String {
        let tree = Parser::new(source).parse().expect("test program parses");
        let js = JsCompiler::new().compile(&tree);
        js.strip_prefix(BANNER).expect("banner present").to_owned()
    }

    #[test]
    fn test_variable_decl_defaults_to_null() {
        assert_eq!(compile("create x;"), "let x = null;\n");
        assert_eq!(compile("create y = 1 + 2;"), "let y = (1 + 2);\n");
    }

    #[test]
    fn test_output_becomes_console_log() {
        assert_eq!(compile("output(\"hi\");"), "console.log(\"hi\");\n");
    }

    #[test]
    fn test_equality_becomes_strict() {
        assert_eq!(compile("output(a == b);"), "console.log((a === b));\n");
        assert_eq!(compile("output(a != b);"), "console.log((a !== b));\n");
    }

    #[test]
    fn test_logical_and_prefix_operators() {
        assert_eq!(
            compile("output(a and b or not c);"),
            "console.log(((a && b) || !(c)));\n"
        );
    }

    #[test]
    fn test_grouping_reemits_parentheses() {
        assert_eq!(compile("output((1 + 2) * 3);"), "console.log((((1 + 2)) * 3));\n");
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            compile("output(\"say \\\"hi\\\"\");"),
            "console.log(\"say \\\"hi\\\"\");\n"
        );
    }

    #[test]
    fn test_numbers_print_javascript_style() {
        assert_eq!(compile("output(6);"), "console.log(6);\n");
        assert_eq!(compile("output(1.5);"), "console.log(1.5);\n");
    }

    #[test]
    fn test_if_else_braces_single_statements() {
        assert_eq!(
            compile("if (x) output(1); else output(2);"),
            "if (x) {\n  console.log(1);\n} else {\n  console.log(2);\n}\n"
        );
    }

    #[test]
    fn test_while_loop() {
        assert_eq!(
            compile("while (x < 3) { x = x + 1; }"),
            "while ((x < 3)) {\n  (x = (x + 1));\n}\n"
        );
    }

    #[test]
    fn test_for_loop_lowers_through_desugaring() {
        let js = compile("for (create i = 0; i < 3; i = i + 1) { output(i); }");
        assert!(js.starts_with("{\n  let i = 0;\n  while ((i < 3)) {\n"));
        assert!(js.contains("console.log(i);"));
        assert!(js.contains("(i = (i + 1));"));
    }

    #[test]
    fn test_function_declaration() {
        assert_eq!(
            compile("func add_one(n) { return n + 1; }"),
            "function add_one(n) {\n  return (n + 1);\n}\n"
        );
    }

    #[test]
    fn test_stdlib_calls_are_inlined() {
        assert_eq!(compile("output(add(a, b));"), "console.log((a + b));\n");
        assert_eq!(compile("output(sqrt(x));"), "console.log(Math.sqrt(x));\n");
        assert_eq!(compile("output(clock());"), "console.log((Date.now() / 1000.0));\n");
        assert_eq!(compile("output(random());"), "console.log(Math.random());\n");
        assert_eq!(compile("output(abs(x));"), "console.log(Math.abs(x));\n");
        assert_eq!(
            compile("output(substring(s, 1, 3));"),
            "console.log(s.substring(1, 3));\n"
        );
        assert_eq!(compile("output(length(s));"), "console.log(s.length);\n");
        assert_eq!(compile("output(typeof(x));"), "console.log(typeof x);\n");
    }

    #[test]
    fn test_stdlib_name_with_wrong_arity_stays_a_plain_call() {
        assert_eq!(compile("output(sqrt(a, b));"), "console.log(sqrt(a, b));\n");
    }

    #[test]
    fn test_user_functions_call_through() {
        assert_eq!(compile("greet(\"you\");"), "greet(\"you\");\n");
    }
}
