use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

/// Array metadata for efficient operations
/// Reference: $PHP_SRC_PATH/Zend/zend_hash.h - HashTable::nNextFreeElement
#[derive(Debug, Clone, Default)]
pub struct ArrayData {
    pub map: IndexMap<ArrayKey, Val>,
    pub next_free: i64, // Cached next auto-increment index (like HashTable::nNextFreeElement)
}

impl ArrayData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key-value pair and update next_free if needed
    /// Reference: $PHP_SRC_PATH/Zend/zend_hash.c - _zend_hash_index_add_or_update_i
    pub fn insert(&mut self, key: ArrayKey, value: Val) -> Option<Val> {
        if let ArrayKey::Int(i) = &key {
            if *i >= self.next_free {
                self.next_free = i.saturating_add(1);
            }
        }
        self.map.insert(key, value)
    }

    /// Append a value with auto-incremented key. Returns `false` without
    /// inserting when the next index is already taken, which happens once
    /// `PHP_INT_MAX` is used as a key.
    /// Reference: $PHP_SRC_PATH/Zend/zend_hash.c - zend_hash_next_index_insert
    pub fn push(&mut self, value: Val) -> bool {
        let key = ArrayKey::Int(self.next_free);
        if self.map.contains_key(&key) {
            return false;
        }
        self.next_free = self.next_free.saturating_add(1);
        self.map.insert(key, value);
        true
    }

    pub fn get(&self, key: &ArrayKey) -> Option<&Val> {
        self.map.get(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArrayKey, &Val)> {
        self.map.iter()
    }
}

impl From<IndexMap<ArrayKey, Val>> for ArrayData {
    fn from(map: IndexMap<ArrayKey, Val>) -> Self {
        let next_free = map
            .keys()
            .filter_map(|k| match k {
                ArrayKey::Int(i) => Some(*i),
                ArrayKey::Str(_) => None,
            })
            .max()
            .map(|i| i.saturating_add(1))
            .unwrap_or(0)
            .max(0);

        Self { map, next_free }
    }
}

impl FromIterator<Val> for ArrayData {
    fn from_iter<T: IntoIterator<Item = Val>>(iter: T) -> Self {
        let mut data = ArrayData::new();
        for value in iter {
            data.push(value);
        }
        data
    }
}

impl PartialEq for ArrayData {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
        // Don't compare next_free as it's cached metadata
    }
}

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub enum ArrayKey {
    Int(i64),
    Str(Rc<Vec<u8>>),
}

impl ArrayKey {
    pub fn str(s: &str) -> Self {
        ArrayKey::Str(Rc::new(s.as_bytes().to_vec()))
    }

    /// Normalize a value used as an array offset
    /// Reference: $PHP_SRC_PATH/Zend/zend_execute.c - zend_fetch_dimension_address_inner
    ///
    /// Returns `None` for values that are illegal offsets (arrays).
    pub fn from_val(value: &Val) -> Option<Self> {
        match value {
            Val::Null => Some(ArrayKey::Str(Rc::new(Vec::new()))),
            Val::Bool(b) => Some(ArrayKey::Int(*b as i64)),
            Val::Int(i) => Some(ArrayKey::Int(*i)),
            Val::Float(f) => Some(ArrayKey::Int(float_to_int(*f))),
            Val::String(s) => Some(match canonical_int_key(s) {
                Some(i) => ArrayKey::Int(i),
                None => ArrayKey::Str(s.clone()),
            }),
            Val::Array(_) => None,
        }
    }
}

/// Decimal integer strings without leading zeros or '+' become integer keys
/// Reference: $PHP_SRC_PATH/Zend/zend_hash.c - _zend_handle_numeric_str_ex
fn canonical_int_key(s: &[u8]) -> Option<i64> {
    let digits = s.strip_prefix(b"-").unwrap_or(s);
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if digits.len() > 1 && digits[0] == b'0' {
        return None;
    }
    if s == b"-0" {
        return None;
    }
    std::str::from_utf8(s).ok()?.parse::<i64>().ok()
}

/// Result of numeric type juggling
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    pub fn to_float(self) -> f64 {
        match self {
            Numeric::Int(i) => i as f64,
            Numeric::Float(f) => f,
        }
    }
}

#[derive(Clone, PartialEq)]
pub enum Val {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Rc<Vec<u8>>),  // PHP strings are byte arrays (COW)
    Array(Rc<ArrayData>), // Array with cached metadata (COW)
}

impl fmt::Debug for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Val::Null => write!(f, "Null"),
            Val::Bool(b) => write!(f, "Bool({b})"),
            Val::Int(i) => write!(f, "Int({i})"),
            Val::Float(x) => write!(f, "Float({x:?})"),
            Val::String(s) => write!(f, "String({:?})", String::from_utf8_lossy(s)),
            Val::Array(arr) => f.debug_map().entries(arr.map.iter()).finish(),
        }
    }
}

impl From<bool> for Val {
    fn from(b: bool) -> Self {
        Val::Bool(b)
    }
}

impl From<i64> for Val {
    fn from(i: i64) -> Self {
        Val::Int(i)
    }
}

impl From<f64> for Val {
    fn from(f: f64) -> Self {
        Val::Float(f)
    }
}

impl From<&str> for Val {
    fn from(s: &str) -> Self {
        Val::String(Rc::new(s.as_bytes().to_vec()))
    }
}

impl From<String> for Val {
    fn from(s: String) -> Self {
        Val::String(Rc::new(s.into_bytes()))
    }
}

impl From<ArrayData> for Val {
    fn from(arr: ArrayData) -> Self {
        Val::Array(Rc::new(arr))
    }
}

impl Val {
    pub fn string(bytes: impl Into<Vec<u8>>) -> Self {
        Val::String(Rc::new(bytes.into()))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Val::Null => "null",
            Val::Bool(_) => "bool",
            Val::Int(_) => "int",
            Val::Float(_) => "float",
            Val::String(_) => "string",
            Val::Array(_) => "array",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Val::Null)
    }

    pub fn as_array(&self) -> Option<&ArrayData> {
        match self {
            Val::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Lossy UTF-8 view of the PHP string conversion, for names and messages
    pub fn to_display_string(&self) -> String {
        String::from_utf8_lossy(&self.to_php_string_bytes()).into_owned()
    }

    /// Convert to string following PHP's zend_make_printable_zval semantics
    /// Reference: $PHP_SRC_PATH/Zend/zend_operators.c - zend_make_printable_zval
    pub fn to_php_string_bytes(&self) -> Vec<u8> {
        match self {
            Val::Null => Vec::new(),
            Val::Bool(b) => {
                if *b {
                    b"1".to_vec()
                } else {
                    Vec::new()
                }
            }
            Val::Int(i) => i.to_string().into_bytes(),
            Val::Float(f) => float_to_php_string(*f).into_bytes(),
            Val::String(s) => s.to_vec(),
            Val::Array(_) => b"Array".to_vec(),
        }
    }

    /// Convert to boolean following PHP's zend_is_true semantics
    /// Reference: $PHP_SRC_PATH/Zend/zend_operators.c - zend_is_true
    pub fn to_bool(&self) -> bool {
        match self {
            Val::Null => false,
            Val::Bool(b) => *b,
            Val::Int(i) => *i != 0,
            Val::Float(f) => *f != 0.0,
            Val::String(s) => !(s.is_empty() || s.as_slice() == b"0"),
            Val::Array(arr) => !arr.map.is_empty(),
        }
    }

    /// Convert to integer following PHP's convert_to_long semantics
    /// Reference: $PHP_SRC_PATH/Zend/zend_operators.c - convert_to_long
    pub fn to_int(&self) -> i64 {
        match self {
            Val::Null => 0,
            Val::Bool(b) => *b as i64,
            Val::Int(i) => *i,
            Val::Float(f) => float_to_int(*f),
            Val::String(s) => match parse_numeric_prefix(s) {
                Some((Numeric::Int(i), _)) => i,
                Some((Numeric::Float(f), _)) => float_to_int(f),
                None => 0,
            },
            Val::Array(arr) => !arr.map.is_empty() as i64,
        }
    }

    /// Convert to float following PHP's convert_to_double semantics
    /// Reference: $PHP_SRC_PATH/Zend/zend_operators.c - convert_to_double
    pub fn to_float(&self) -> f64 {
        match self {
            Val::Float(f) => *f,
            Val::String(s) => parse_numeric_prefix(s)
                .map(|(n, _)| n.to_float())
                .unwrap_or(0.0),
            other => other.to_int() as f64,
        }
    }

    /// Operand conversion for arithmetic: `None` for arrays and for strings
    /// without a numeric prefix, which PHP 8 rejects with a `TypeError`.
    /// Leading-numeric strings such as `"12abc"` use their prefix.
    /// Reference: $PHP_SRC_PATH/Zend/zend_operators.c - zendi_smart_str / _zval_get_number
    pub fn to_numeric(&self) -> Option<Numeric> {
        match self {
            Val::Null => Some(Numeric::Int(0)),
            Val::Bool(b) => Some(Numeric::Int(*b as i64)),
            Val::Int(i) => Some(Numeric::Int(*i)),
            Val::Float(f) => Some(Numeric::Float(*f)),
            Val::String(s) => parse_numeric_prefix(s).map(|(n, _)| n),
            Val::Array(_) => None,
        }
    }

    /// Numeric value of a string only when the whole string is numeric
    /// Reference: $PHP_SRC_PATH/Zend/zend_operators.c - is_numeric_string_ex
    pub fn numeric_string_value(&self) -> Option<Numeric> {
        match self {
            Val::String(s) => match parse_numeric_prefix(s) {
                Some((n, true)) => Some(n),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Float to integer conversion with PHP's modular semantics for out-of-range values
/// Reference: $PHP_SRC_PATH/Zend/zend_operators.h - zend_dval_to_lval
pub fn float_to_int(f: f64) -> i64 {
    if !f.is_finite() {
        return 0;
    }
    if f >= -9.223372036854775808e18 && f < 9.223372036854775808e18 {
        return f as i64;
    }
    let two_64 = 18446744073709551616.0_f64;
    let wrapped = f.trunc().rem_euclid(two_64);
    if wrapped >= 9.223372036854775808e18 {
        (wrapped - two_64) as i64
    } else {
        wrapped as i64
    }
}

/// Format a float the way PHP's string conversion does (precision = 14)
/// Reference: $PHP_SRC_PATH/main/snprintf.c - php_gcvt
pub fn float_to_php_string(f: f64) -> String {
    if f.is_nan() {
        return "NAN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    if f == 0.0 {
        return if f.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // 14 significant digits: one before the point, 13 after
    let sci = format!("{:.13e}", f);
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return sci;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= 14 {
        let mut mantissa = trim_fraction(mantissa).to_string();
        if !mantissa.contains('.') {
            mantissa.push_str(".0");
        }
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}E{sign}{}", exponent.abs())
    } else {
        let decimals = (13 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, f)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Parse the numeric prefix of a string, returning (value, is_whole_string)
/// Reference: $PHP_SRC_PATH/Zend/zend_operators.c - _is_numeric_string_ex
pub fn parse_numeric_prefix(s: &[u8]) -> Option<(Numeric, bool)> {
    let is_ws = |b: &u8| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0b' | b'\x0c');

    let start = s.iter().position(|b| !is_ws(b))?;
    let mut pos = start;

    if matches!(s.get(pos), Some(b'+') | Some(b'-')) {
        pos += 1;
    }

    let int_digits = s[pos..].iter().take_while(|b| b.is_ascii_digit()).count();
    pos += int_digits;

    let mut is_float = false;
    let mut frac_digits = 0;
    if s.get(pos) == Some(&b'.') {
        frac_digits = s[pos + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if int_digits > 0 || frac_digits > 0 {
            is_float = true;
            pos += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(s.get(pos), Some(b'e') | Some(b'E')) {
        let mut exp_pos = pos + 1;
        if matches!(s.get(exp_pos), Some(b'+') | Some(b'-')) {
            exp_pos += 1;
        }
        let exp_digits = s[exp_pos.min(s.len())..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if exp_digits > 0 {
            is_float = true;
            pos = exp_pos + exp_digits;
        }
    }

    let text = std::str::from_utf8(&s[start..pos]).ok()?;
    let whole = s[pos..].iter().all(is_ws);

    let value = if is_float {
        Numeric::Float(text.parse::<f64>().ok()?)
    } else {
        match text.parse::<i64>() {
            Ok(i) => Numeric::Int(i),
            // Integer overflow falls back to float
            Err(_) => Numeric::Float(text.parse::<f64>().ok()?),
        }
    };

    Some((value, whole))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_next_free_tracks_explicit_int_keys() {
        let mut arr = ArrayData::new();
        arr.push(Val::Int(10));
        arr.insert(ArrayKey::Int(5), Val::Int(20));
        arr.insert(ArrayKey::str("x"), Val::Int(30));
        arr.push(Val::Int(40));

        let keys: Vec<_> = arr.map.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                ArrayKey::Int(0),
                ArrayKey::Int(5),
                ArrayKey::str("x"),
                ArrayKey::Int(6)
            ]
        );
    }

    #[test]
    fn test_push_after_max_key_is_rejected() {
        let mut arr = ArrayData::new();
        arr.insert(ArrayKey::Int(i64::MAX), Val::Int(1));
        assert!(!arr.push(Val::Int(2)));
        assert_eq!(arr.len(), 1);
        assert_eq!(arr.get(&ArrayKey::Int(i64::MAX)), Some(&Val::Int(1)));
    }

    #[test]
    fn test_to_numeric_rejects_non_numeric_strings() {
        assert_eq!(Val::from("abc").to_numeric(), None);
        assert_eq!(Val::from("").to_numeric(), None);
        assert_eq!(Val::from("12abc").to_numeric(), Some(Numeric::Int(12)));
        assert_eq!(Val::from(" 1.5").to_numeric(), Some(Numeric::Float(1.5)));
        assert_eq!(Val::Null.to_numeric(), Some(Numeric::Int(0)));
    }

    #[test]
    fn test_array_key_normalization() {
        assert_eq!(ArrayKey::from_val(&Val::from("8")), Some(ArrayKey::Int(8)));
        assert_eq!(ArrayKey::from_val(&Val::from("-3")), Some(ArrayKey::Int(-3)));
        assert_eq!(ArrayKey::from_val(&Val::from("08")), Some(ArrayKey::str("08")));
        assert_eq!(ArrayKey::from_val(&Val::from("-0")), Some(ArrayKey::str("-0")));
        assert_eq!(ArrayKey::from_val(&Val::Float(1.9)), Some(ArrayKey::Int(1)));
        assert_eq!(ArrayKey::from_val(&Val::Bool(true)), Some(ArrayKey::Int(1)));
        assert_eq!(ArrayKey::from_val(&Val::Null), Some(ArrayKey::str("")));
        assert_eq!(ArrayKey::from_val(&Val::from(ArrayData::new())), None);
    }

    #[test]
    fn test_to_bool() {
        assert!(!Val::from("0").to_bool());
        assert!(!Val::from("").to_bool());
        assert!(Val::from("0.0").to_bool());
        assert!(!Val::Float(0.0).to_bool());
        assert!(!Val::from(ArrayData::new()).to_bool());
    }

    #[test]
    fn test_numeric_prefix() {
        assert_eq!(parse_numeric_prefix(b"42"), Some((Numeric::Int(42), true)));
        assert_eq!(parse_numeric_prefix(b" 1.5 "), Some((Numeric::Float(1.5), true)));
        assert_eq!(parse_numeric_prefix(b"1e3"), Some((Numeric::Float(1000.0), true)));
        assert_eq!(parse_numeric_prefix(b"5 apples"), Some((Numeric::Int(5), false)));
        assert_eq!(parse_numeric_prefix(b".5"), Some((Numeric::Float(0.5), true)));
        assert_eq!(parse_numeric_prefix(b"abc"), None);
        assert_eq!(parse_numeric_prefix(b"-"), None);
    }

    #[test]
    fn test_float_to_string() {
        assert_eq!(float_to_php_string(1.0), "1");
        assert_eq!(float_to_php_string(0.1 + 0.2), "0.3");
        assert_eq!(float_to_php_string(-2.5), "-2.5");
        assert_eq!(float_to_php_string(1e25), "1.0E+25");
        assert_eq!(float_to_php_string(1.5e-7), "1.5E-7");
        assert_eq!(float_to_php_string(0.0001), "0.0001");
        assert_eq!(float_to_php_string(f64::INFINITY), "INF");
    }

    #[test]
    fn test_float_to_int() {
        assert_eq!(float_to_int(3.99), 3);
        assert_eq!(float_to_int(-3.99), -3);
        assert_eq!(float_to_int(f64::NAN), 0);
        assert_eq!(float_to_int(18446744073709551616.0 + 4096.0), 4096);
    }
}
