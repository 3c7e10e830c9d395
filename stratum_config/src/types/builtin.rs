//! Handlers installed by [`TypeRegistry::new`](super::TypeRegistry::new).

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::Level;

use super::collections::map_of;
use super::handler::TypedHandler;
use super::map_value::named_values;
use super::{
    ConfigFile, FieldValue, IpMask, IpNetwork, Shape, TypeRegistry, ValueError,
    format_duration, parse_duration,
};

/// Parse a boolean from `1`, `t`, `true`, `0`, `f`, `false` and their
/// upper- and title-case spellings.
pub(crate) fn parse_bool(raw: &str) -> Result<bool, ValueError> {
    match raw.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(ValueError::new(format!("parsing {raw:?}: invalid syntax"))),
    }
}

/// Parse an integer with an optional sign and `0x`, `0o` or `0b` prefix.
pub(crate) fn parse_integer(raw: &str) -> Result<i128, ValueError> {
    let text = raw.trim();
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (radix, digits) = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)]
        .into_iter()
        .find_map(|(prefix, radix)| unsigned.strip_prefix(prefix).map(|rest| (radix, rest)))
        .unwrap_or((10, unsigned));
    if digits.starts_with(['+', '-']) {
        return Err(ValueError::new(format!("parsing {raw:?}: invalid syntax")));
    }
    let magnitude = i128::from_str_radix(&digits.replace('_', ""), radix)
        .map_err(|err| ValueError::new(format!("parsing {raw:?}: {err}")))?;
    Ok(if negative { -magnitude } else { magnitude })
}

fn integer<T>(label: &str) -> TypedHandler<T>
where
    T: TryFrom<i128> + Copy + Default + fmt::Display + Send + Sync + 'static,
    i128: TryFrom<T>,
{
    TypedHandler::<T>::new(
        label,
        |raw| {
            let wide = parse_integer(raw)?;
            T::try_from(wide)
                .map_err(|_| ValueError::new(format!("parsing {raw:?}: value out of range")))
        },
        |value: &T| value.to_string(),
    )
    .inspect(|value| {
        i128::try_from(*value).map_or_else(|_| FieldValue::Text(value.to_string()), FieldValue::Integer)
    })
    .zero(T::default)
}

fn float<T>(label: &str) -> TypedHandler<T>
where
    T: FromStr + Into<f64> + Copy + Default + fmt::Display + 'static,
    T::Err: fmt::Display,
{
    TypedHandler::<T>::new(
        label,
        |raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|err| ValueError::new(format!("parsing {raw:?}: {err}")))
        },
        |value: &T| value.to_string(),
    )
    .inspect(|value| FieldValue::Float((*value).into()))
    .zero(T::default)
}

/// Handler backed by [`FromStr`] and [`fmt::Display`].
pub(crate) fn from_str<T>(label: &str) -> TypedHandler<T>
where
    T: FromStr + fmt::Display + 'static,
    T::Err: fmt::Display,
{
    TypedHandler::<T>::new(
        label,
        |raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|err| ValueError::new(err.to_string()))
        },
        |value: &T| value.to_string(),
    )
}

fn string() -> TypedHandler<String> {
    TypedHandler::<String>::new("string", |raw| Ok(raw.to_owned()), String::clone).zero(String::new)
}

pub(super) fn boolean() -> TypedHandler<bool> {
    TypedHandler::<bool>::new("bool", parse_bool, |value: &bool| value.to_string())
        .shape(Shape::Flag)
        .inspect(|value| FieldValue::Bool(*value))
        .zero(|| false)
}

macro_rules! integers {
    ($registry:ident; $($ty:ty),+ $(,)?) => {
        $( $registry.install_builtin_with_list(integer::<$ty>(stringify!($ty))); )+
    };
}

pub(super) fn install(registry: &mut TypeRegistry) {
    registry.install_builtin_with_list(boolean());
    integers!(registry; i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
    registry.install_builtin_with_list(float::<f32>("f32"));
    registry.install_builtin_with_list(float::<f64>("f64"));
    registry.install_builtin_with_list(string());
    registry.install_builtin_with_list(
        TypedHandler::<PathBuf>::new(
            "path",
            |raw| Ok(PathBuf::from(raw)),
            |path: &PathBuf| path.display().to_string(),
        )
        .zero(PathBuf::new),
    );
    registry.install_builtin_with_list(
        TypedHandler::<Duration>::new("duration", parse_duration, format_duration)
            .inspect(|value| FieldValue::Duration(*value))
            .zero(|| Duration::ZERO),
    );
    registry.install_builtin_with_list(
        from_str::<IpAddr>("ip").zero(|| IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
    );
    registry.install_builtin_with_list(from_str::<Ipv4Addr>("ipv4").zero(|| Ipv4Addr::UNSPECIFIED));
    registry.install_builtin_with_list(from_str::<Ipv6Addr>("ipv6").zero(|| Ipv6Addr::UNSPECIFIED));
    registry.install_builtin_with_list(from_str::<IpMask>("ipmask").zero(IpMask::default));
    registry.install_builtin_with_list(from_str::<IpNetwork>("ipnet").zero(IpNetwork::default));
    registry.install_builtin(
        TypedHandler::<ConfigFile>::new(
            "file",
            |raw| Ok(ConfigFile::new(raw)),
            |file: &ConfigFile| file.to_string(),
        )
        .zero(ConfigFile::default),
    );

    let text = string();
    let int64 = integer::<i64>("i64");
    registry.install_builtin(map_of::<BTreeMap<String, String>, String>("map[string]string", &text));
    registry.install_builtin(map_of::<HashMap<String, String>, String>("map[string]string", &text));
    registry.install_builtin(map_of::<BTreeMap<String, i64>, i64>("map[string]i64", &int64));
    registry.install_builtin(map_of::<HashMap<String, i64>, i64>("map[string]i64", &int64));

    registry.install_builtin_with_list(named_values(
        "level",
        vec![
            ("trace".to_owned(), Level::TRACE),
            ("debug".to_owned(), Level::DEBUG),
            ("info".to_owned(), Level::INFO),
            ("warn".to_owned(), Level::WARN),
            ("error".to_owned(), Level::ERROR),
        ],
    ));
}
