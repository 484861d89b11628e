use super::environment::Environment;
use super::errors::{RuntimeError, RuntimeErrorType, RuntimeResult};
use super::function::CosmoFn;
use super::native_function::get_native_funcs;
use super::object::Object;
use crate::frontend::grammar::{
    Expr, ExprType, Literal, LogicalOperator, Stmt, StmtType,
};

/// Outcome of executing one statement. `Return` travels outward through
/// enclosing blocks and loops until a function call boundary absorbs it.
#[derive(Debug, PartialEq)]
pub enum Signal {
    Normal,
    Return(Object),
}

/// Tree-walking statement executor and expression evaluator.
///
/// The output sink is injected at construction and invoked once per
/// `output` statement; there is no default destination.
pub struct Interpreter<'out> {
    env: Environment,
    sink: Box<dyn FnMut(&str) + 'out>,
}

impl<'out> Interpreter<'out> {
    pub fn new(sink: Box<dyn FnMut(&str) + 'out>) -> Self {
        let env = Environment::new();
        for native_func in get_native_funcs().into_iter() {
            let name = native_func.name().to_owned();
            env.define(name, Object::NativeFunc(native_func));
        }

        Interpreter { env, sink }
    }

    pub(crate) fn swap_env(&mut self, mut env: Environment) -> Environment {
        std::mem::swap(&mut self.env, &mut env);
        env
    }

    /// Runs a whole program. The first runtime error aborts the remaining
    /// statements; output already emitted stays emitted.
    pub fn eval_statements(&mut self, stmts: &[Stmt]) -> RuntimeResult<()> {
        for stmt in stmts.iter() {
            if let Signal::Return(_) = self.eval_statement(stmt)? {
                return Err(RuntimeError::new(
                    RuntimeErrorType::ReturnOutsideFunction,
                    Some(stmt.span),
                ));
            }
        }
        Ok(())
    }

    /// Runs a statement list in the current environment, stopping early on a
    /// return signal. Used for block bodies and function bodies.
    pub(crate) fn eval_statement_list(&mut self, stmts: &[Stmt]) -> RuntimeResult<Signal> {
        for stmt in stmts.iter() {
            match self.eval_statement(stmt)? {
                Signal::Normal => {}
                signal => return Ok(signal),
            }
        }
        Ok(Signal::Normal)
    }

    fn eval_statement(&mut self, stmt: &Stmt) -> RuntimeResult<Signal> {
        match &stmt.stmt {
            StmtType::Expression(expr) => {
                self.eval_expression(expr)?;
            }
            StmtType::Output(expr) => {
                let value = self.eval_expression(expr)?;
                (self.sink)(&value.to_string());
            }
            StmtType::IfElse(if_condition, if_body, else_body) => {
                return self.eval_if_else(if_condition, if_body, else_body.as_deref());
            }
            StmtType::While(condition, body) => return self.eval_while(condition, body),
            StmtType::VariableDecl(name, initializer) => {
                let value = match initializer {
                    Some(expr) => self.eval_expression(expr)?,
                    None => Object::Nil,
                };
                self.env.define(name.name.clone(), value);
            }
            StmtType::Block(stmts) => return self.eval_block(stmts),
            StmtType::FuncDecl(func_info) => {
                let func = CosmoFn::new(func_info, self.env.clone());
                self.env
                    .define(func_info.ident.name.clone(), Object::CosmoFunc(func));
            }
            StmtType::Return(expr) => {
                let value = match expr {
                    Some(expr) => self.eval_expression(expr)?,
                    None => Object::Nil,
                };
                return Ok(Signal::Return(value));
            }
        }

        Ok(Signal::Normal)
    }

    fn eval_if_else(
        &mut self,
        if_condition: &Expr,
        if_body: &Stmt,
        else_body: Option<&Stmt>,
    ) -> RuntimeResult<Signal> {
        if self.eval_expression(if_condition)?.is_truthy() {
            return self.eval_statement(if_body);
        }
        if let Some(else_body) = else_body {
            return self.eval_statement(else_body);
        }

        Ok(Signal::Normal)
    }

    fn eval_while(&mut self, condition: &Expr, body: &Stmt) -> RuntimeResult<Signal> {
        while self.eval_expression(condition)?.is_truthy() {
            match self.eval_statement(body)? {
                Signal::Normal => {}
                signal => return Ok(signal),
            }
        }

        Ok(Signal::Normal)
    }

    fn eval_block(&mut self, stmts: &[Stmt]) -> RuntimeResult<Signal> {
        let prev_env = self.env.clone();
        self.env = Environment::with_enclosing(&prev_env);

        let result = self.eval_statement_list(stmts);

        // Reset to enclosing environment on every exit path.
        self.env = prev_env;
        result
    }

    pub fn eval_expression(&mut self, expr: &Expr) -> RuntimeResult<Object> {
        match &expr.expr {
            ExprType::Literal(l) => Ok(eval_literal(l)),
            ExprType::Infix(op, lhs, rhs) => {
                let lhs = self.eval_expression(lhs)?;
                let rhs = self.eval_expression(rhs)?;
                Object::apply_infix_op(*op, lhs, rhs)
                    .map_err(|e| RuntimeError::new(e, Some(expr.span)))
            }
            ExprType::Prefix(op, operand) => {
                let value = self.eval_expression(operand)?;
                Object::apply_prefix_op(*op, value)
                    .map_err(|e| RuntimeError::new(e, Some(expr.span)))
            }
            ExprType::Logical(op, lhs, rhs) => self.eval_logical_operator(*op, lhs, rhs),
            ExprType::Variable(var) => self
                .env
                .get(&var.name)
                .map_err(|e| RuntimeError::new(e, Some(var.span))),
            ExprType::Assignment(var, value_expr) => {
                let value = self.eval_expression(value_expr)?;
                self.env
                    .assign(&var.name, value.clone())
                    .map_err(|e| RuntimeError::new(e, Some(var.span)))?;
                Ok(value)
            }
            ExprType::Call(callee, args) => self.eval_func_call(callee, args, expr.span),
            ExprType::Grouping(inner) => self.eval_expression(inner),
        }
    }

    fn eval_logical_operator(
        &mut self,
        op: LogicalOperator,
        lhs: &Expr,
        rhs: &Expr,
    ) -> RuntimeResult<Object> {
        let lhs = self.eval_expression(lhs)?;

        // Short circuiting: the deciding operand is returned unconverted.
        match op {
            LogicalOperator::And if !lhs.is_truthy() => Ok(lhs),
            LogicalOperator::Or if lhs.is_truthy() => Ok(lhs),
            _ => self.eval_expression(rhs),
        }
    }

    fn eval_func_call(
        &mut self,
        callee: &Expr,
        raw_args: &[Expr],
        call_span: crate::frontend::span::Span,
    ) -> RuntimeResult<Object> {
        let callee = self.eval_expression(callee)?;
        let mut args = Vec::with_capacity(raw_args.len());
        for raw_arg in raw_args.iter() {
            args.push(self.eval_expression(raw_arg)?);
        }

        callee
            .execute(args, self)
            .map_err(|e| e.or_span(call_span))
    }
}

fn eval_literal(l: &Literal) -> Object {
    match l {
        Literal::Number(n) => Object::Number(*n),
        Literal::Boolean(b) => Object::Boolean(*b),
        Literal::Str(s) => Object::String(s.clone()),
        Literal::Null => Object::Nil,
    }
}
