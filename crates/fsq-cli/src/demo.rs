//! Demo "field system" object bound as `fs`.
//!
//! Mimics the shared-memory status block of an antenna control system:
//! nested records, fixed-size byte buffers holding NUL-padded names,
//! a sequence of records and a couple of methods.

use std::rc::Rc;

use fsq_eval::objects::{ByteBuffer, DynRecord, VecSequence};
use fsq_eval::{HostError, ParamType, Signature, Value};

const TAG: &str = "json";

fn time() -> Value {
    DynRecord::new("fs.Time")
        .add_tagged_field("Year", TAG, "year", 2024i64)
        .add_tagged_field("Day", TAG, "day", 187i64)
        .add_tagged_field("Seconds", TAG, "seconds,omitempty", 45_296.5f64)
        .into_value()
}

fn source(name: &str, ra: f64, dec: f64) -> Value {
    DynRecord::new("fs.Source")
        .add_tagged_field("Name", TAG, "name", name)
        .add_tagged_field("Ra", TAG, "ra", ra)
        .add_tagged_field("Dec", TAG, "dec", dec)
        .into_value()
}

fn bytes(content: &str, size: usize) -> Value {
    Value::Sequence(Rc::new(ByteBuffer::padded(content.as_bytes(), size)))
}

/// Build the demo record.
pub fn field_system() -> Value {
    let sources = VecSequence::new(
        "[]fs.Source",
        vec![
            source("3c84", 49.95, 41.51),
            source("0552+398", 88.88, 39.81),
            source("1921-293", 291.21, -29.24),
        ],
    );

    let scale = Signature::new(vec![ParamType::Float], vec![ParamType::Float]);
    let status = Signature::new(vec![], vec![ParamType::String, ParamType::Int]);

    DynRecord::new("fs.Fscom")
        .add_tagged_field("Time", TAG, "time", time())
        .add_tagged_field("Lskd", TAG, "lskd", bytes("r41098", 8))
        .add_tagged_field("Lproc", TAG, "lproc", bytes("point", 8))
        .add_tagged_field("Rack", TAG, "rack,omitempty", "dbbc3")
        .add_tagged_field("Sources", TAG, "sources", Value::Sequence(Rc::new(sources)))
        .add_field("KHALT", false)
        .add_field("Xtemp", 21.5f64)
        .add_field("IclopenFd", 3i64)
        .add_method("Scale", scale, |args| match args {
            [Value::Float(x)] => Ok(vec![Value::Float(x * 2.0)]),
            _ => Err(HostError::new("Scale takes a float")),
        })
        .add_method("Status", status, |_| {
            Ok(vec![Value::from("tracking"), Value::Int(0)])
        })
        .into_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsq_eval::{EvalConfig, Evaluator};
    use pretty_assertions::assert_eq;

    fn evaluator() -> Evaluator {
        let mut ev = Evaluator::with_config(EvalConfig::default().with_display_tag(TAG));
        ev.bind("fs", field_system()).unwrap();
        ev
    }

    fn loaded(ev: &mut Evaluator, source: &str) -> Value {
        ev.eval(source).and_then(|v| v.load()).unwrap()
    }

    #[test]
    fn test_demo_fields() {
        let mut ev = evaluator();
        assert_eq!(loaded(&mut ev, "fs.time.year"), Value::Int(2024));
        assert_eq!(loaded(&mut ev, "str(fs.lskd)"), Value::from("r41098"));
        assert_eq!(loaded(&mut ev, "fs.sources[1].name"), Value::from("0552+398"));
        assert_eq!(loaded(&mut ev, "fs.iclopen_fd"), Value::Int(3));
        assert_eq!(loaded(&mut ev, "fs._temp"), Value::Float(21.5));
    }

    #[test]
    fn test_demo_methods() {
        let mut ev = evaluator();
        assert_eq!(loaded(&mut ev, "fs.scale(2)"), Value::Float(4.0));
        assert_eq!(
            loaded(&mut ev, "fs.status()"),
            Value::List(vec![Value::from("tracking"), Value::Int(0)])
        );
    }

    #[test]
    fn test_demo_listing() {
        let mut ev = evaluator();
        let Value::Sequence(names) = loaded(&mut ev, "ls(fs)") else {
            panic!("ls should return a sequence");
        };
        let names: Vec<String> = (0..names.len())
            .filter_map(|i| names.get(i))
            .map(|v| v.to_string())
            .collect();
        assert_eq!(
            names,
            vec!["Scale", "Status", "time", "lskd", "lproc", "rack", "sources"]
        );
    }
}
