use sprig_value::{BuiltinVars, Value};

/// Returns the default [`BuiltinVars`] that should be used.
pub fn default_builtin_vars() -> BuiltinVars {
    let mut builtin_vars = BuiltinVars::new();
    builtin_vars.add_native_fn("clock", clock, 0);
    builtin_vars.add_native_fn("str", str, 1);
    builtin_vars.add_native_fn("len", len, 1);
    builtin_vars.add_native_fn("assert", assert, 1);
    builtin_vars.add_native_fn("assert_eq", assert_eq, 2);
    builtin_vars
}

/// Seconds since the unix epoch.
pub fn clock(_args: &[Value]) -> Result<Value, String> {
    let since_the_epoch_secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_err(|_| "Time went backwards.".to_string())?
        .as_secs_f64();
    Ok(Value::Number(since_the_epoch_secs))
}

pub fn str(args: &[Value]) -> Result<Value, String> {
    Ok(Value::from(args[0].to_string()))
}

pub fn len(args: &[Value]) -> Result<Value, String> {
    match args[0].cast_to_str() {
        Some(string) => Ok(Value::Number(string.chars().count() as f64)),
        None => Err(format!(
            "Expected a string but got a {}.",
            args[0].type_name()
        )),
    }
}

pub fn assert(args: &[Value]) -> Result<Value, String> {
    if args[0].is_truthy() {
        Ok(Value::Nil)
    } else {
        Err("Assertion failed.".to_string())
    }
}

pub fn assert_eq(args: &[Value]) -> Result<Value, String> {
    let left = &args[0];
    let right = &args[1];

    if left == right {
        Ok(Value::Nil)
    } else {
        Err(format!("Assertion failed: {:?} != {:?}.", left, right))
    }
}
