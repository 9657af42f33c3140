//! Small adapters showing how web-style inputs plug into the decoder.

use std::collections::HashMap;

use unravel::{
    Decoder, Error, Source, SourceBox, StringSource, Unravel, Values, decode,
    decode_new,
};

/// Parsed query string: every key may appear several times.
struct QuerySource {
    values: HashMap<String, Vec<String>>,
}

impl QuerySource {
    fn parse(query: &str) -> Self {
        let mut values: HashMap<String, Vec<String>> = HashMap::new();
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            values
                .entry(key.to_owned())
                .or_default()
                .push(value.to_owned());
        }
        Self { values }
    }
}

impl Source for QuerySource {
    fn get(&self, key: &str) -> Result<SourceBox<'_>, Error> {
        match self.values.get(key) {
            Some(values) => Ok(Box::new(Occurrences(values))),
            None => Err(Error::no_value()),
        }
    }
}

/// All values of one query key. Scalars need exactly one of them.
struct Occurrences<'a>(&'a [String]);

impl Occurrences<'_> {
    fn single(&self) -> Result<StringSource<'_>, Error> {
        match self.0 {
            [value] => Ok(StringSource(value)),
            _ => Err(Error::not_supported()),
        }
    }
}

impl Source for Occurrences<'_> {
    fn bool(&self) -> Result<bool, Error> {
        self.single()?.bool()
    }

    fn int(&self) -> Result<i64, Error> {
        self.single()?.int()
    }

    fn uint(&self) -> Result<u64, Error> {
        self.single()?.uint()
    }

    fn float(&self) -> Result<f64, Error> {
        self.single()?.float()
    }

    fn string(&self) -> Result<String, Error> {
        self.single()?.string()
    }

    fn iterate(&self) -> Result<Values<'_>, Error> {
        Ok(Box::new(
            self.0
                .iter()
                .map(|value| Ok::<_, Error>(Box::new(StringSource(value)) as SourceBox<'_>)),
        ))
    }
}

#[derive(Unravel, Debug, PartialEq)]
struct Basket {
    #[unravel(url = "pay")]
    pub payment_method: String,
    #[unravel(url = "itemId")]
    pub item_ids: Vec<i64>,
    #[unravel(url = "coupon")]
    pub coupon: Option<String>,
}

#[unravel_testhelpers::test]
fn url_query() {
    let query = QuerySource::parse("itemId=42&itemId=34&itemId=69&pay=Credit");

    let decoder = Decoder::new().with_tag("url");
    let basket: Basket = decoder.decode_new(&query).unwrap();

    assert_eq!(
        basket,
        Basket {
            payment_method: "Credit".to_owned(),
            item_ids: vec![42, 34, 69],
            coupon: None,
        }
    );
}

#[unravel_testhelpers::test]
fn url_query_with_repeated_scalar() {
    let query = QuerySource::parse("pay=Credit&pay=Cash");

    let err = Decoder::new()
        .with_tag("url")
        .decode_new::<Basket>(&query)
        .unwrap_err();
    assert!(err.is_not_supported());
    assert_eq!(err.path(), &[unravel::PathSegment::Field("pay")]);
}

/// Parameters captured from a route like `/register/student/{name}/age/{age}`.
struct PathParams {
    params: Vec<(&'static str, String)>,
}

impl PathParams {
    fn matching(pattern: &'static str, path: &str) -> Option<Self> {
        let pattern: Vec<&'static str> = pattern.trim_matches('/').split('/').collect();
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        if pattern.len() != segments.len() {
            return None;
        }

        let mut params = Vec::new();
        for (expected, actual) in pattern.into_iter().zip(segments) {
            match expected.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                Some(name) => params.push((name, actual.to_owned())),
                None if expected == actual => {}
                None => return None,
            }
        }

        Some(Self { params })
    }
}

impl Source for PathParams {
    fn get(&self, key: &str) -> Result<SourceBox<'_>, Error> {
        self.params
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| Box::new(StringSource(value)) as SourceBox<'_>)
            .ok_or_else(Error::no_value)
    }
}

#[derive(Unravel, Debug, Default, PartialEq)]
struct Registration {
    pub name: String,
    pub age: u8,
}

#[unravel_testhelpers::test]
fn path_parameters() {
    let params =
        PathParams::matching("/register/student/{name}/age/{age}", "/register/student/Albert/age/18")
            .unwrap();

    let student: Registration = decode_new(&params).unwrap();
    assert_eq!(
        student,
        Registration {
            name: "Albert".to_owned(),
            age: 18,
        }
    );
}

#[unravel_testhelpers::test]
fn path_parameters_out_of_range() {
    let params =
        PathParams::matching("/register/student/{name}/age/{age}", "/register/student/Old/age/300")
            .unwrap();

    let mut student = Registration::default();
    let err = decode(&params, &mut student).unwrap_err();

    assert!(err.is_out_of_range());
    // fields before the failing one are already set
    assert_eq!(student.name, "Old");
}
