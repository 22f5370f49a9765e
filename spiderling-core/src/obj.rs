//! Line-oriented record parser for Wavefront OBJ model files
use std::io::BufRead;
use std::str;

use nalgebra::Point3;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, i64 as index, space0, space1},
    combinator::{all_consuming, map, opt},
    multi::many1,
    number::complete::float,
    sequence::{preceded, terminated, tuple},
    IResult,
};
use serde::Deserialize;

use crate::error::ParseError;
use crate::geometry::{Vec2, Vec3};

/// Which corner spellings a face record may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CornerFormat {
    /// Every corner is `v/t/n`
    #[default]
    Full,
    /// Also accept `v`, `v/t` and `v//n`
    Partial,
}

/// One corner of a face, as raw 1-based indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    pub vertex: i64,
    pub texcoord: Option<i64>,
    pub normal: Option<i64>,
}

impl Corner {
    pub fn new(vertex: i64, texcoord: i64, normal: i64) -> Self {
        Self {
            vertex,
            texcoord: Some(texcoord),
            normal: Some(normal),
        }
    }
}

/// A polygon with three or more corners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub corners: Vec<Corner>,
}

/// A decoded line of the model file
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Vertex(Point3<f32>),
    Normal(Vec3),
    TexCoord(Vec2),
    Face(Face),
}

/// A record together with the 1-based line it came from
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub line: usize,
    pub record: Record,
}

/// Lazily yields records from a text source, one line at a time.
///
/// Blank lines and `#` comments are skipped. A line that fails to decode,
/// including one that is not valid UTF-8, yields an error item and the
/// iteration carries on with the next line.
pub struct RecordParser<R> {
    reader: R,
    buf: Vec<u8>,
    line: usize,
    corner_format: CornerFormat,
}

impl<R: BufRead> RecordParser<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line: 0,
            corner_format: CornerFormat::default(),
        }
    }

    pub fn with_corner_format(mut self, corner_format: CornerFormat) -> Self {
        self.corner_format = corner_format;
        self
    }
}

impl<R: BufRead> Iterator for RecordParser<R> {
    type Item = Result<ParsedRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(ParseError::Io(e))),
            }
            self.line += 1;

            let text = match str::from_utf8(&self.buf) {
                Ok(text) => text,
                Err(e) => {
                    return Some(Err(malformed(
                        "line",
                        self.line,
                        format!("invalid UTF-8 at byte {}", e.valid_up_to()),
                    )))
                }
            };

            match parse_line(text, self.line, self.corner_format) {
                Ok(Some(record)) => {
                    return Some(Ok(ParsedRecord {
                        line: self.line,
                        record,
                    }))
                }
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Classify a line by its leading token and decode its fields
fn parse_line(
    text: &str,
    line: usize,
    corner_format: CornerFormat,
) -> Result<Option<Record>, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (keyword, rest) = match trimmed.find(char::is_whitespace) {
        Some(split) => trimmed.split_at(split),
        None => (trimmed, ""),
    };

    let record = match keyword {
        "vn" => {
            let [x, y, z] = decode("vn", line, rest, vector3)?;
            Record::Normal(Vec3::new(x, y, z))
        }
        "vt" => {
            let [u, v] = decode("vt", line, rest, texcoord)?;
            Record::TexCoord(Vec2::new(u, v))
        }
        "v" => {
            let [x, y, z] = decode("v", line, rest, vector3)?;
            Record::Vertex(Point3::new(x, y, z))
        }
        "f" => Record::Face(parse_face(rest, line, corner_format)?),
        token => {
            return Err(ParseError::UnknownLineType {
                line,
                token: token.to_string(),
            })
        }
    };

    Ok(Some(record))
}

/// Run a fixed-arity float parser over the whole remainder of a line
fn decode<const N: usize>(
    keyword: &'static str,
    line: usize,
    rest: &str,
    parser: fn(&str) -> IResult<&str, [f32; N]>,
) -> Result<[f32; N], ParseError> {
    let (_, values) = all_consuming(terminated(parser, space0))(rest).map_err(|_| {
        malformed(
            keyword,
            line,
            format!("expected {} numbers, got '{}'", N, rest.trim()),
        )
    })?;

    if values.iter().any(|value| !value.is_finite()) {
        return Err(malformed(keyword, line, "non-finite value".to_string()));
    }
    Ok(values)
}

fn parse_face(rest: &str, line: usize, corner_format: CornerFormat) -> Result<Face, ParseError> {
    let corner: fn(&str) -> IResult<&str, Corner> = match corner_format {
        CornerFormat::Full => full_corner,
        CornerFormat::Partial => partial_corner,
    };

    let (_, corners) = all_consuming(terminated(many1(preceded(space1, corner)), space0))(rest)
        .map_err(|_| {
            let expected = match corner_format {
                CornerFormat::Full => "v/t/n",
                CornerFormat::Partial => "v, v/t, v//n or v/t/n",
            };
            malformed(
                "f",
                line,
                format!("corners must be {}, got '{}'", expected, rest.trim()),
            )
        })?;

    if corners.len() < 3 {
        return Err(malformed(
            "f",
            line,
            format!("a face needs at least 3 corners, found {}", corners.len()),
        ));
    }

    Ok(Face { corners })
}

fn malformed(keyword: &'static str, line: usize, reason: String) -> ParseError {
    ParseError::Malformed {
        line,
        keyword,
        reason,
    }
}

fn field(input: &str) -> IResult<&str, f32> {
    preceded(space1, float)(input)
}

fn vector3(input: &str) -> IResult<&str, [f32; 3]> {
    map(tuple((field, field, field)), |(x, y, z)| [x, y, z])(input)
}

/// `u v` with an optional third component that is dropped
fn texcoord(input: &str) -> IResult<&str, [f32; 2]> {
    map(tuple((field, field, opt(field))), |(u, v, _)| [u, v])(input)
}

fn slash_index(input: &str) -> IResult<&str, i64> {
    preceded(char('/'), index)(input)
}

fn full_corner(input: &str) -> IResult<&str, Corner> {
    map(tuple((index, slash_index, slash_index)), |(v, t, n)| {
        Corner::new(v, t, n)
    })(input)
}

fn partial_corner(input: &str) -> IResult<&str, Corner> {
    alt((
        map(tuple((index, tag("//"), index)), |(vertex, _, normal)| Corner {
            vertex,
            texcoord: None,
            normal: Some(normal),
        }),
        map(
            tuple((index, slash_index, opt(slash_index))),
            |(vertex, texcoord, normal)| Corner {
                vertex,
                texcoord: Some(texcoord),
                normal,
            },
        ),
        map(index, |vertex| Corner {
            vertex,
            texcoord: None,
            normal: None,
        }),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> Vec<Result<ParsedRecord, ParseError>> {
        RecordParser::new(Cursor::new(text)).collect()
    }

    fn line(text: &str) -> Result<Option<Record>, ParseError> {
        parse_line(text, 1, CornerFormat::Full)
    }

    #[test]
    fn test_classifies_by_leading_token() {
        assert_eq!(
            line("v 1 2 3").unwrap(),
            Some(Record::Vertex(Point3::new(1.0, 2.0, 3.0)))
        );
        assert_eq!(
            line("vn 0.0 1.0 0.0").unwrap(),
            Some(Record::Normal(Vec3::new(0.0, 1.0, 0.0)))
        );
        assert_eq!(
            line("vt 0.25 0.75").unwrap(),
            Some(Record::TexCoord(Vec2::new(0.25, 0.75)))
        );
        assert_eq!(
            line("f 1/2/3 4/5/6 7/8/9").unwrap(),
            Some(Record::Face(Face {
                corners: vec![Corner::new(1, 2, 3), Corner::new(4, 5, 6), Corner::new(7, 8, 9)]
            }))
        );
    }

    #[test]
    fn test_skips_comments_and_blank_lines() {
        assert_eq!(line("").unwrap(), None);
        assert_eq!(line("   \t ").unwrap(), None);
        assert_eq!(line("# v 1 2 3").unwrap(), None);
        assert_eq!(line("   # indented").unwrap(), None);
    }

    #[test]
    fn test_tolerates_extra_whitespace() {
        assert_eq!(
            line("  v\t-1.5   2e1 \t .5  \r").unwrap(),
            Some(Record::Vertex(Point3::new(-1.5, 20.0, 0.5)))
        );
    }

    #[test]
    fn test_texcoord_ignores_third_component() {
        assert_eq!(
            line("vt 0.5 0.5 1.0").unwrap(),
            Some(Record::TexCoord(Vec2::new(0.5, 0.5)))
        );
        assert!(matches!(
            line("vt 0.5 0.5 1.0 2.0"),
            Err(ParseError::Malformed { keyword: "vt", .. })
        ));
    }

    #[test]
    fn test_field_count_and_numeric_errors() {
        for bad in ["v 1 2", "v 1 2 3 4", "vn 1 x 3", "v", "v 1.0.0 2 3", "vn nan 0 1"] {
            assert!(
                matches!(line(bad), Err(ParseError::Malformed { .. })),
                "expected malformed: {}",
                bad
            );
        }
    }

    #[test]
    fn test_unknown_line_type() {
        match line("usemtl stone") {
            Err(ParseError::UnknownLineType { token, .. }) => assert_eq!(token, "usemtl"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            line("vp 1 2 3"),
            Err(ParseError::UnknownLineType { .. })
        ));
    }

    #[test]
    fn test_face_errors() {
        assert!(matches!(
            line("f 1/1/1 2/2/2"),
            Err(ParseError::Malformed { keyword: "f", .. })
        ));
        assert!(matches!(
            line("f 1/1/1 2/2/2 3//3"),
            Err(ParseError::Malformed { keyword: "f", .. })
        ));
        assert!(matches!(
            line("f 1 2 3"),
            Err(ParseError::Malformed { keyword: "f", .. })
        ));
    }

    #[test]
    fn test_face_keeps_non_positive_indices_for_the_assembler() {
        assert_eq!(
            line("f 0/1/1 -2/1/1 3/1/1").unwrap(),
            Some(Record::Face(Face {
                corners: vec![Corner::new(0, 1, 1), Corner::new(-2, 1, 1), Corner::new(3, 1, 1)]
            }))
        );
    }

    #[test]
    fn test_partial_corners() {
        let record = parse_line("f 1 2/5 3//7 4/6/8", 1, CornerFormat::Partial).unwrap();
        assert_eq!(
            record,
            Some(Record::Face(Face {
                corners: vec![
                    Corner {
                        vertex: 1,
                        texcoord: None,
                        normal: None
                    },
                    Corner {
                        vertex: 2,
                        texcoord: Some(5),
                        normal: None
                    },
                    Corner {
                        vertex: 3,
                        texcoord: None,
                        normal: Some(7)
                    },
                    Corner::new(4, 6, 8),
                ]
            }))
        );
    }

    #[test]
    fn test_iterator_reports_line_numbers_and_continues() {
        let items = parse("# header\nv 1 2 3\n\nv oops\nvn 0 0 1\nfoo\n");
        assert_eq!(items.len(), 4);

        let first = items[0].as_ref().unwrap();
        assert_eq!(first.line, 2);
        assert!(matches!(
            items[1],
            Err(ParseError::Malformed { line: 4, keyword: "v", .. })
        ));
        assert_eq!(items[2].as_ref().unwrap().line, 5);
        assert!(matches!(
            items[3],
            Err(ParseError::UnknownLineType { line: 6, .. })
        ));
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let text: &[u8] = b"v 0 0 0\n# cr\xe9\xe9 par moi\nv 1 0 0\r\nv 0 1 0";
        let items: Vec<_> = RecordParser::new(text).collect();
        assert_eq!(items.len(), 4);

        assert!(matches!(
            items[1],
            Err(ParseError::Malformed { line: 2, keyword: "line", .. })
        ));
        assert_eq!(items[2].as_ref().unwrap().line, 3);
        // last line has no trailing newline
        let last = items[3].as_ref().unwrap();
        assert_eq!(last.line, 4);
        assert_eq!(last.record, Record::Vertex(Point3::new(0.0, 1.0, 0.0)));
    }
}
