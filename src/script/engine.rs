use bson::{Bson, Document};
use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use super::Value;
use crate::error::{HelperError, Result, ScriptError};
use crate::helpers::{Helper, ScriptSession};
use crate::host::{DatabaseHandle, ShellHost};
use crate::parser::{
    ArrayExpr, Expr, MemberExpr, MemberProperty, NewExpr, ObjectExpr, Parser, Statement,
    UnaryExpr, UnaryOperator,
};

/// Evaluates script statements against one [`ScriptSession`].
///
/// Every statement yields a [`Value`]. Evaluation stops at the first
/// failing statement; bindings made by earlier statements stay in place.
pub struct ScriptEngine<H: ShellHost> {
    session: ScriptSession<H>,
    parser: Parser,
}

impl<H: ShellHost> ScriptEngine<H> {
    pub fn new(session: ScriptSession<H>) -> Self {
        Self {
            session,
            parser: Parser::new(),
        }
    }

    /// Split a script into statements without evaluating them.
    pub fn parse(&self, script: &str) -> Result<Vec<Statement>> {
        self.parser.parse_script(script)
    }

    /// Parse and evaluate a whole script.
    pub fn run(&mut self, script: &str) -> Result<Vec<Value>> {
        let statements = self.parse(script)?;
        statements.iter().map(|stmt| self.execute(stmt)).collect()
    }

    /// Evaluate one statement.
    pub fn execute(&mut self, statement: &Statement) -> Result<Value> {
        trace!("Executing statement at {:?}", statement.span());
        match statement {
            Statement::Use(name, _) => self.select_database(name),
            Statement::Expr(expr, _) => self.evaluate(expr),
        }
    }

    pub fn session(&self) -> &ScriptSession<H> {
        &self.session
    }

    /// Evaluate an expression
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::String(s) => Ok(Value::Bson(Bson::String(s.clone()))),
            Expr::Number(n) => Ok(Value::Bson(number_to_bson(*n))),
            Expr::Boolean(b) => Ok(Value::Bson(Bson::Boolean(*b))),
            Expr::Null => Ok(Value::Bson(Bson::Null)),
            Expr::Undefined => Ok(Value::Undefined),
            Expr::Object(obj) => self.evaluate_object(obj).map(|d| Value::Bson(Bson::Document(d))),
            Expr::Array(arr) => self.evaluate_array(arr).map(|a| Value::Bson(Bson::Array(a))),
            Expr::Ident(name) => self.evaluate_identifier(name),
            Expr::Member(member) => self.evaluate_member(member),
            Expr::Call(call) => self.evaluate_call(&call.callee, &call.arguments),
            Expr::New(new_expr) => self.evaluate_new(new_expr),
            Expr::Unary(unary) => self.evaluate_unary(unary),
        }
    }

    fn evaluate_object(&mut self, obj: &ObjectExpr) -> Result<Document> {
        let mut doc = Document::new();
        for prop in &obj.properties {
            let value = self.evaluate(&prop.value)?.into_bson()?;
            doc.insert(prop.key.as_str(), value);
        }
        Ok(doc)
    }

    fn evaluate_array(&mut self, arr: &ArrayExpr) -> Result<Vec<Bson>> {
        arr.elements
            .iter()
            .map(|element| self.evaluate(element)?.into_bson())
            .collect()
    }

    fn evaluate_identifier(&self, name: &str) -> Result<Value> {
        if name == "db" {
            return self.current_database();
        }
        match Helper::from_name(name) {
            Some(helper) => Err(ScriptError::Unsupported(format!(
                "{} can only be called, not used as a value",
                helper
            ))
            .into()),
            None => Err(ScriptError::UnknownIdentifier(name.to_string()).into()),
        }
    }

    fn current_database(&self) -> Result<Value> {
        self.session
            .database_name()
            .map(|name| Value::Database(name.to_string()))
            .ok_or_else(|| ScriptError::NoCurrentDatabase.into())
    }

    fn evaluate_member(&mut self, member: &MemberExpr) -> Result<Value> {
        let object = self.evaluate(&member.object)?;
        let property = self.property_name(&member.property)?;
        Err(ScriptError::Unsupported(format!(
            "property '{}' of {}",
            property,
            object.kind()
        ))
        .into())
    }

    fn property_name(&mut self, property: &MemberProperty) -> Result<String> {
        match property {
            MemberProperty::Ident(name) => Ok(name.clone()),
            MemberProperty::Computed(expr) => Ok(self.evaluate(expr)?.to_script_string()),
        }
    }

    fn evaluate_call(&mut self, callee: &Expr, arguments: &[Expr]) -> Result<Value> {
        match callee {
            Expr::Ident(name) => match Helper::from_name(name) {
                Some(helper) => {
                    let args = self.evaluate_arguments(arguments)?;
                    self.call_helper(helper, args)
                }
                None if name == "db" => Err(ScriptError::UnknownFunction(name.clone()).into()),
                None => Err(ScriptError::UnknownIdentifier(name.clone()).into()),
            },
            Expr::Member(member) => {
                let object = self.evaluate(&member.object)?;
                let method = self.property_name(&member.property)?;
                match (&object, method.as_str()) {
                    (Value::Database(name), "getName") => {
                        Ok(Value::Bson(Bson::String(name.clone())))
                    }
                    _ => Err(ScriptError::UnknownFunction(format!(
                        "{}.{}",
                        object.kind(),
                        method
                    ))
                    .into()),
                }
            }
            other => Err(ScriptError::UnknownFunction(other.describe().to_string()).into()),
        }
    }

    fn evaluate_new(&mut self, new_expr: &NewExpr) -> Result<Value> {
        let Expr::Ident(name) = new_expr.callee.as_ref() else {
            return Err(ScriptError::Unsupported(format!(
                "new on {}",
                new_expr.callee.describe()
            ))
            .into());
        };

        match Helper::from_name(name) {
            Some(Helper::Use) => {
                Err(ScriptError::Unsupported("use is not a constructor".to_string()).into())
            }
            Some(helper) => {
                let args = self.evaluate_arguments(&new_expr.arguments)?;
                self.call_helper(helper, args)
            }
            None => Err(ScriptError::UnknownIdentifier(name.clone()).into()),
        }
    }

    fn evaluate_unary(&mut self, unary: &UnaryExpr) -> Result<Value> {
        let value = self.evaluate(&unary.argument)?;
        match (unary.operator, value) {
            (UnaryOperator::Not, Value::Bson(Bson::Boolean(b))) => {
                Ok(Value::Bson(Bson::Boolean(!b)))
            }
            (UnaryOperator::Minus, Value::Bson(Bson::Int64(i))) => Ok(Value::Bson(
                i.checked_neg()
                    .map(Bson::Int64)
                    .unwrap_or(Bson::Double(-(i as f64))),
            )),
            (UnaryOperator::Minus, Value::Bson(Bson::Int32(i))) => Ok(Value::Bson(
                i.checked_neg()
                    .map(Bson::Int32)
                    .unwrap_or(Bson::Int64(-i64::from(i))),
            )),
            (UnaryOperator::Minus, Value::Bson(Bson::Double(d))) => {
                Ok(Value::Bson(Bson::Double(-d)))
            }
            (UnaryOperator::Plus, value) if value.as_f64().is_some() => Ok(value),
            (operator, value) => Err(ScriptError::Unsupported(format!(
                "{:?} applied to {}",
                operator,
                value.kind()
            ))
            .into()),
        }
    }

    fn evaluate_arguments(&mut self, arguments: &[Expr]) -> Result<Vec<Value>> {
        arguments.iter().map(|arg| self.evaluate(arg)).collect()
    }

    fn call_helper(&mut self, helper: Helper, args: Vec<Value>) -> Result<Value> {
        debug!("Calling {} with {} argument(s)", helper, args.len());
        match helper {
            Helper::ObjectId => self.call_object_id(args),
            Helper::DbRef => self.call_db_ref(args),
            Helper::IsoDate => call_date(helper, args, |s| self.session.iso_date(s)),
            Helper::Date => call_date(helper, args, |s| self.session.date(s)),
            Helper::Use => {
                check_arity(helper, &args, 1)?;
                let name = args
                    .first()
                    .map(Value::to_script_string)
                    .unwrap_or_else(|| Value::Undefined.to_script_string());
                self.select_database(&name)
            }
        }
    }

    fn call_object_id(&self, args: Vec<Value>) -> Result<Value> {
        check_arity(Helper::ObjectId, &args, 1)?;
        match args.into_iter().next() {
            None | Some(Value::Undefined) => {
                Ok(Value::Bson(Bson::ObjectId(self.session.new_object_id())))
            }
            Some(Value::Bson(Bson::String(s))) => {
                Ok(Value::Bson(Bson::ObjectId(self.session.object_id(&s)?)))
            }
            Some(Value::Bson(Bson::ObjectId(oid))) => Ok(Value::Bson(Bson::ObjectId(oid))),
            Some(other) => Err(HelperError::InvalidIdentifierFormat {
                input: other.to_script_string(),
                reason: format!("expected a hex string, got {}", other.kind()),
            }
            .into()),
        }
    }

    fn call_db_ref(&self, args: Vec<Value>) -> Result<Value> {
        check_arity(Helper::DbRef, &args, 2)?;
        let mut args = args.into_iter();

        let collection = match args.next() {
            None | Some(Value::Undefined) | Some(Value::Bson(Bson::Null)) => {
                return Err(HelperError::InvalidReferenceConstruction {
                    collection: String::new(),
                    reason: "collection name can not be null".to_string(),
                }
                .into());
            }
            Some(Value::Bson(Bson::String(s))) => s,
            Some(other) => {
                return Err(ScriptError::InvalidArguments(format!(
                    "DBRef collection name must be a string, got {}",
                    other.kind()
                ))
                .into());
            }
        };
        let id = args.next().unwrap_or(Value::Undefined).into_bson()?;

        Ok(Value::DbRef(self.session.db_ref(&collection, id)?))
    }

    fn select_database(&mut self, name: &str) -> Result<Value> {
        let db = self.session.use_database(name)?;
        Ok(Value::Database(db.name().to_string()))
    }
}

/// `ISODate(...)` and `Date(...)`: no argument means now, numbers are
/// epoch milliseconds, strings go through the helper's layouts.
fn call_date<F>(helper: Helper, args: Vec<Value>, parse: F) -> Result<Value>
where
    F: FnOnce(&str) -> std::result::Result<DateTime<Utc>, HelperError>,
{
    check_arity(helper, &args, 1)?;
    match args.into_iter().next() {
        None | Some(Value::Undefined) => Ok(Value::Date(Utc::now())),
        Some(Value::Bson(Bson::String(s))) => Ok(Value::Date(parse(&s)?)),
        Some(Value::Date(dt)) => Ok(Value::Date(dt)),
        Some(other) => {
            let millis = other
                .as_f64()
                .filter(|n| n.is_finite())
                .and_then(|n| DateTime::from_timestamp_millis(n as i64));
            millis.map(Value::Date).ok_or_else(|| {
                ScriptError::InvalidArguments(format!(
                    "{} expects a string or epoch milliseconds, got {}",
                    helper,
                    other.kind()
                ))
                .into()
            })
        }
    }
}

fn check_arity(helper: Helper, args: &[Value], max: usize) -> Result<()> {
    if args.len() > max {
        return Err(ScriptError::InvalidArguments(format!(
            "{} expects at most {} argument(s), got {}",
            helper,
            max,
            args.len()
        ))
        .into());
    }
    Ok(())
}

fn number_to_bson(n: f64) -> Bson {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Bson::Int64(n as i64)
    } else {
        Bson::Double(n)
    }
}
