/// Identity record exposing its name parts in concatenation order.
pub trait NameFields {
    fn name_fields(&self) -> [Option<&str>; 3];
}

/// Join the present, non-blank name parts with single spaces.
pub fn normalize_fields<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut joined = String::new();
    for field in fields.into_iter().flatten() {
        let field = field.trim();
        if field.is_empty() {
            continue;
        }
        joined.push_str(field);
        joined.push(' ');
    }

    joined.truncate(joined.trim_end().len());
    joined
}

/// Normalized name of an identity record; a missing record normalizes to an empty string.
pub fn normalize_name<T>(identity: Option<&T>) -> String
where
    T: NameFields + ?Sized,
{
    identity
        .map(|identity| normalize_fields(identity.name_fields()))
        .unwrap_or_default()
}
