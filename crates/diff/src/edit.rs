//! Edit scripts.

use serde::{Deserialize, Serialize};

/// What an [`EditOp`] does to its element.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EditCommand {
    Keep,
    Delete,
    Insert,
}

/// One step of an edit script from `a` to `b`.
///
/// `index` is a position in `a` for `Keep` and `Delete`, and a position in
/// `b` for `Insert`. `seq` is the position of the element in the target
/// sequence; deletes have none and serialize it as `-1`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EditOp {
    pub index: usize,
    pub command: EditCommand,
    #[serde(with = "seq_format")]
    pub seq: Option<usize>,
}

impl EditOp {
    pub fn keep(index: usize, seq: usize) -> Self {
        Self {
            index,
            command: EditCommand::Keep,
            seq: Some(seq),
        }
    }

    pub fn delete(index: usize) -> Self {
        Self {
            index,
            command: EditCommand::Delete,
            seq: None,
        }
    }

    pub fn insert(index: usize, seq: usize) -> Self {
        Self {
            index,
            command: EditCommand::Insert,
            seq: Some(seq),
        }
    }
}

/// Number of inserts plus deletes.
pub fn edit_distance(ops: &[EditOp]) -> usize {
    ops.iter().filter(|op| op.command != EditCommand::Keep).count()
}

/// Replays `ops` against `a`, taking inserted elements from `b`.
///
/// Returns `None` when the script does not walk both sequences in order from
/// start to end, or when a `seq` disagrees with the output position.
pub fn apply_edit_script<T: Clone>(a: &[T], b: &[T], ops: &[EditOp]) -> Option<Vec<T>> {
    let mut out = Vec::with_capacity(b.len());
    let (mut ai, mut bi) = (0usize, 0usize);
    for op in ops {
        match op.command {
            EditCommand::Delete => {
                if op.index != ai || op.seq.is_some() {
                    return None;
                }
                ai += 1;
            }
            EditCommand::Keep => {
                if op.index != ai || op.seq != Some(out.len()) {
                    return None;
                }
                out.push(a.get(ai)?.clone());
                ai += 1;
                bi += 1;
            }
            EditCommand::Insert => {
                if op.index != bi || op.seq != Some(out.len()) {
                    return None;
                }
                out.push(b.get(bi)?.clone());
                bi += 1;
            }
        }
    }
    (ai == a.len() && bi == b.len()).then_some(out)
}

mod seq_format {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(seq: &Option<usize>, s: S) -> Result<S::Ok, S::Error> {
        match seq {
            Some(v) => s.serialize_u64(*v as u64),
            None => s.serialize_i64(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
        let raw = i64::deserialize(d)?;
        Ok(usize::try_from(raw).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_a_script() {
        let a: Vec<char> = "abc".chars().collect();
        let b: Vec<char> = "axc".chars().collect();
        let ops = vec![
            EditOp::keep(0, 0),
            EditOp::delete(1),
            EditOp::insert(1, 1),
            EditOp::keep(2, 2),
        ];
        assert_eq!(apply_edit_script(&a, &b, &ops), Some(b.clone()));
        assert_eq!(edit_distance(&ops), 2);
    }

    #[test]
    fn rejects_incomplete_or_out_of_order_scripts() {
        let a: Vec<char> = "ab".chars().collect();
        let b: Vec<char> = "ab".chars().collect();
        assert_eq!(apply_edit_script(&a, &b, &[EditOp::keep(0, 0)]), None);
        assert_eq!(
            apply_edit_script(&a, &b, &[EditOp::keep(1, 0), EditOp::keep(0, 1)]),
            None
        );
        assert_eq!(
            apply_edit_script(&a, &b, &[EditOp::keep(0, 0), EditOp::keep(1, 5)]),
            None
        );
    }

    #[test]
    fn delete_seq_serializes_as_minus_one() {
        let json = serde_json::to_value(EditOp::delete(3)).expect("serialize");
        assert_eq!(json["index"], 3);
        assert_eq!(json["command"], "delete");
        assert_eq!(json["seq"], -1);

        let back: EditOp = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, EditOp::delete(3));
        let keep: EditOp =
            serde_json::from_str(r#"{"index":1,"command":"keep","seq":4}"#).expect("deserialize");
        assert_eq!(keep, EditOp::keep(1, 4));
    }
}
