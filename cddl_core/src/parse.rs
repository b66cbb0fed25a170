/***************************************************************************************************
 * Copyright (c) 2019-2021 Jeremy O'Donoghue. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice (including the next
 * paragraph) shall be included in all copies or substantial portions of the
 * Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * Parser for one CDDL rule body, based on the grammar in RFC8610, Appendix B.
 *
 * The implementation uses the "Nom" parser combinator library. Rule splitting (the `name =
 * body` dictionary) happens ahead of this in `lexer.rs`; this module parses the body text of
 * one rule into the concrete-syntax `Type` / `Group` trees in `ast.rs`. The `alt(...)` ordering
 * within `type2` and `grpent` is load-bearing: it fixes CDDL's ordered-choice precedence and
 * must not be reshuffled.
 **************************************************************************************************/
extern crate base64;
extern crate hex;
extern crate nom;

use nom::{
    branch::alt, bytes::complete::tag, combinator::opt, error::ErrorKind, error::ParseError as NomParseError,
    multi::many0, multi::many1, sequence::delimited, sequence::preceded, sequence::terminated,
    sequence::tuple, AsChar, Err, IResult, InputIter, Slice,
};
use std::iter::FromIterator;

use crate::ast::{BsQual, Group, GroupItem, MemberKey, Occurs, Operator, Type, Value};
use crate::hexfloat;

type Buf<'a> = &'a str;
type CDDLError<'a> = (Buf<'a>, ErrorKind);
type ParseResult<'a, T> = IResult<Buf<'a>, T, CDDLError<'a>>;

macro_rules! parse_err {
    ($buf:expr, $kind:expr) => {
        Err(Err::Error(NomParseError::from_error_kind($buf, $kind)))
    };
}

/// Parses a full group rule body: `grpchoice *(S "//" S grpchoice)`.
pub fn group_rule_body(b: Buf) -> ParseResult<Group> {
    delimited(s, group, s)(b)
}

/// Parses a full type rule body: `type1 *(S "/" S type1)`.
pub fn type_rule_body(b: Buf) -> ParseResult<Type> {
    delimited(s, type0, s)(b)
}

/// `type = type1 *(S "/" S type1)`
fn type0(b: Buf) -> ParseResult<Type> {
    fn type1s(b: Buf) -> ParseResult<Vec<Type>> {
        many0(preceded(tuple((s, char_is('/'), s)), type1))(b)
    }
    let (i, t) = type1(b)?;
    let (i, ts) = type1s(i)?;
    if ts.is_empty() {
        Ok((i, t))
    } else {
        let mut v = vec![t];
        v.extend(ts);
        Ok((i, Type::Types(v)))
    }
}

/// `type1 = type2 [S (rangeop / ctlop) S type2]`
fn type1(b: Buf) -> ParseResult<Type> {
    let (i, first) = type2(b)?;
    let (i, tail) = opt(preceded(s, rangeop_name))(i)?;
    let op_name = match tail {
        None => return Ok((i, first)),
        Some(op_name) => op_name,
    };
    match op_name {
        RangeOrCtl::Range(op) => {
            let (i, second) = preceded(s, type2)(i)?;
            Ok((i, Type::Combined(Box::new(first), Box::new(second), op)))
        }
        RangeOrCtl::CtlName(name) => {
            // A control operator's argument is itself a type2 (e.g. `.size 4`, `.cbor bstr`).
            let (i, arg) = opt(preceded(s, type2))(i)?;
            Ok((
                i,
                Type::Combined(Box::new(first), Box::new(Type::Any), Operator::Control(name, arg.map(Box::new))),
            ))
        }
    }
}

enum RangeOrCtl {
    Range(Operator),
    CtlName(String),
}

fn rangeop_name(b: Buf) -> ParseResult<RangeOrCtl> {
    alt((
        |b| rangeop(b).map(|(i, op)| (i, RangeOrCtl::Range(op))),
        |b| ctlop_name(b).map(|(i, name)| (i, RangeOrCtl::CtlName(name))),
    ))(b)
}

/// `type2 = value / typename / "(" S type S ")" / "{" S group S "}" / "[" S group S "]"
///        / "~" S typename / "&" S "(" S group S ")" / "&" S groupname
///        / "#" "6" ["." uint] "(" S type S ")" / "#" DIGIT ["." uint] / "#"`
fn type2(b: Buf) -> ParseResult<Type> {
    fn p_value(b: Buf) -> ParseResult<Type> {
        let (i, v) = value(b)?;
        Ok((i, Type::Value(v)))
    }
    fn p_rule(b: Buf) -> ParseResult<Type> {
        let (i, tn) = typename(b)?;
        Ok((i, Type::Rule(tn)))
    }
    fn p_types(b: Buf) -> ParseResult<Type> {
        delimited(tuple((char_is('('), s)), type0, tuple((s, char_is(')'))))(b)
    }
    fn p_groupmap(b: Buf) -> ParseResult<Type> {
        let (i, g) = delimited(tuple((char_is('{'), s)), group, tuple((s, char_is('}'))))(b)?;
        Ok((i, Type::GroupMap(g)))
    }
    fn p_grouparray(b: Buf) -> ParseResult<Type> {
        let (i, g) = delimited(tuple((char_is('['), s)), group, tuple((s, char_is(']'))))(b)?;
        Ok((i, Type::GroupArray(g)))
    }
    fn p_unwrap(b: Buf) -> ParseResult<Type> {
        let (i, _) = tuple((char_is('~'), s))(b)?;
        let (i, tn) = typename(i)?;
        Ok((i, Type::Unwrap(tn)))
    }
    fn p_groupenum(b: Buf) -> ParseResult<Type> {
        let (i, g) = delimited(
            tuple((char_is('&'), s, char_is('('), s)),
            group,
            tuple((s, char_is(')'))),
        )(b)?;
        Ok((i, Type::GroupEnum(g)))
    }
    fn p_groupname_enum(b: Buf) -> ParseResult<Type> {
        let (i, gn) = preceded(tuple((char_is('&'), s)), typename)(b)?;
        Ok((i, Type::Rule(gn)))
    }
    fn p_tagged(b: Buf) -> ParseResult<Type> {
        let (i, _) = tuple((char_is('#'), char_is('6')))(b)?;
        let (i, tag) = opt(preceded(char_is('.'), uint))(i)?;
        let (i, typ) = delimited(tuple((char_is('('), s)), type0, tuple((s, char_is(')'))))(i)?;
        Ok((i, Type::Tagged(tag, Box::new(typ))))
    }
    fn p_major(b: Buf) -> ParseResult<Type> {
        let (i, mt) = preceded(char_is('#'), digit)(b)?;
        let (i, ai) = opt(preceded(char_is('.'), uint))(i)?;
        let major = mt as i64 - 0x30i64;
        Ok((i, Type::Major(major, ai)))
    }
    fn p_any(b: Buf) -> ParseResult<Type> {
        let (i, _) = char_is('#')(b)?;
        Ok((i, Type::Any))
    }
    alt((
        p_value,
        p_rule,
        p_types,
        p_groupmap,
        p_grouparray,
        p_unwrap,
        p_groupenum,
        p_groupname_enum,
        p_tagged,
        p_major,
        p_any,
    ))(b)
}

/// `group = grpchoice *(S "//" S grpchoice)`
fn group(b: Buf) -> ParseResult<Group> {
    let (i, gc1) = grpchoice(b)?;
    let (i, gcs) = many0(preceded(tuple((s, tag("//"), s)), grpchoice))(i)?;
    let mut result = gc1;
    for gc in gcs {
        result.extend(gc);
    }
    Ok((i, result))
}

/// `grpchoice = *(grpent optcom)`
fn grpchoice(b: Buf) -> ParseResult<Group> {
    many0(terminated(grpent, optcom))(b)
}

/// `grpent = [occur S] [memberkey S] type / [occur S] groupname / [occur S] "(" S group S ")"`
fn grpent(b: Buf) -> ParseResult<GroupItem> {
    fn p_occur(b: Buf) -> ParseResult<Occurs> {
        let (i, occ) = opt(terminated(occur, s))(b)?;
        Ok((i, occ.unwrap_or(Occurs::Once)))
    }
    fn p_memberkey(b: Buf) -> ParseResult<GroupItem> {
        let (i, occ) = p_occur(b)?;
        let (i, mk) = opt(terminated(memberkey, s))(i)?;
        let (i, typ) = type0(i)?;
        Ok((i, GroupItem::Key(mk.map(Box::new), typ, occ)))
    }
    fn p_groupname(b: Buf) -> ParseResult<GroupItem> {
        let (i, occ) = p_occur(b)?;
        let (i, gn) = groupname(i)?;
        Ok((i, GroupItem::Name(gn, occ)))
    }
    fn p_groupdef(b: Buf) -> ParseResult<GroupItem> {
        let (i, occ) = p_occur(b)?;
        let (i, grp) = delimited(tuple((char_is('('), s)), group, tuple((s, char_is(')'))))(i)?;
        Ok((i, GroupItem::Grp(grp, occ)))
    }
    alt((p_memberkey, p_groupname, p_groupdef))(b)
}

/// `memberkey = type1 S ["^" S] "=>" / bareword S ":" / value S ":"`
fn memberkey(b: Buf) -> ParseResult<MemberKey> {
    fn p_type1(b: Buf) -> ParseResult<MemberKey> {
        let (i, t1) = terminated(type1, s)(b)?;
        let (i, _cut) = opt(terminated(char_is('^'), s))(i)?;
        let (i, _) = tag("=>")(i)?;
        Ok((i, MemberKey::FromType(Box::new(t1))))
    }
    fn p_bareword(b: Buf) -> ParseResult<MemberKey> {
        let (i, bw) = terminated(bareword, tuple((s, char_is(':'))))(b)?;
        Ok((i, MemberKey::FromValue(Box::new(Value::Tstr(bw)))))
    }
    fn p_value(b: Buf) -> ParseResult<MemberKey> {
        let (i, val) = terminated(value, tuple((s, char_is(':'))))(b)?;
        Ok((i, MemberKey::FromValue(Box::new(val))))
    }
    alt((p_type1, p_bareword, p_value))(b)
}

//*************************************************************************************************
// Qualifiers
//*************************************************************************************************

fn rangeop(b: Buf) -> ParseResult<Operator> {
    let (i, matched) = alt((tag("..."), tag("..")))(b)?;
    match matched {
        "..." => Ok((i, Operator::RangeExcl)),
        _ => Ok((i, Operator::RangeIncl)),
    }
}

/// `ctlop = "." id`, returning just the control operator name; the caller (`type1::op_type2`)
/// parses the following `type2` as the argument.
fn ctlop_name(b: Buf) -> ParseResult<String> {
    preceded(char_is('.'), id)(b)
}

fn occur(b: Buf) -> ParseResult<Occurs> {
    fn from_to(b: Buf) -> ParseResult<Occurs> {
        let (i, from) = opt(uint)(b)?;
        let (i, _) = char_is('*')(i)?;
        let (i, upto) = opt(uint)(i)?;
        let from_value = from.unwrap_or(0);
        let upto_value = upto.unwrap_or(i64::MAX);
        if from_value == 0 && upto.is_none() {
            Ok((i, Occurs::ZeroPlus))
        } else if from_value == 0 && upto_value == 1 {
            Ok((i, Occurs::Optional))
        } else {
            Ok((i, Occurs::Between(from_value, upto_value)))
        }
    }
    fn one_or_more(b: Buf) -> ParseResult<Occurs> {
        let (i, _) = char_is('+')(b)?;
        Ok((i, Occurs::OnePlus))
    }
    fn optional(b: Buf) -> ParseResult<Occurs> {
        let (i, _) = char_is('?')(b)?;
        Ok((i, Occurs::Optional))
    }
    alt((from_to, one_or_more, optional))(b)
}

//*************************************************************************************************
// Values, identifiers and terminals
//*************************************************************************************************

fn uint(b: Buf) -> ParseResult<i64> {
    fn dec_int(b: Buf) -> ParseResult<i64> {
        let (i, first_dig) = digit1(b)?;
        let (i, rest_digs) = many0(digit)(i)?;
        let mut s = String::from_iter(rest_digs);
        s.insert(0, first_dig);
        match i64::from_str_radix(&s, 10) {
            Ok(val) => Ok((i, val)),
            Err(_) => parse_err!(i, ErrorKind::Digit),
        }
    }
    fn hex_int(b: Buf) -> ParseResult<i64> {
        let (i, _) = tag("0x")(b)?;
        let (i, digits) = many1(hexdig)(i)?;
        match i64::from_str_radix(&String::from_iter(digits), 16) {
            Ok(val) => Ok((i, val)),
            Err(_) => parse_err!(i, ErrorKind::HexDigit),
        }
    }
    fn bin_int(b: Buf) -> ParseResult<i64> {
        let (i, _) = tag("0b")(b)?;
        let (i, digits) = many1(bindig)(i)?;
        match i64::from_str_radix(&String::from_iter(digits), 2) {
            Ok(val) => Ok((i, val)),
            Err(_) => parse_err!(i, ErrorKind::HexDigit),
        }
    }
    fn zero_int(b: Buf) -> ParseResult<i64> {
        let (i, _) = char_is('0')(b)?;
        Ok((i, 0i64))
    }
    alt((hex_int, bin_int, dec_int, zero_int))(b)
}

fn value(b: Buf) -> ParseResult<Value> {
    alt((boolean, number, text, bytes))(b)
}

fn boolean(b: Buf) -> ParseResult<Value> {
    let (i, matched) = alt((tag("true"), tag("false")))(b)?;
    Ok((i, Value::Bool(matched == "true")))
}

fn int(b: Buf) -> ParseResult<i64> {
    let (i, sign) = opt(char_is('-'))(b)?;
    let (i, val) = uint(i)?;
    Ok((i, if sign.is_some() { -val } else { val }))
}

fn number(b: Buf) -> ParseResult<Value> {
    fn int_or_float(b: Buf) -> ParseResult<Value> {
        let (i, int) = int(b)?;
        let (i, frac_part) = opt(preceded(char_is('.'), fraction))(i)?;
        let (i, exp_part) = opt(preceded(char_is('e'), exponent))(i)?;
        match (frac_part, exp_part) {
            (None, None) => Ok((i, Value::Int(int))),
            (Some(frac), None) => {
                let s = format!("{}.{}", int, frac);
                Ok((i, Value::Float(s.parse::<f64>().unwrap())))
            }
            (None, Some(exp)) => {
                let s = format!("{}e{}", int, exp);
                Ok((i, Value::Float(s.parse::<f64>().unwrap())))
            }
            (Some(frac), Some(exp)) => {
                let s = format!("{}.{}e{}", int, frac, exp);
                Ok((i, Value::Float(s.parse::<f64>().unwrap())))
            }
        }
    }
    alt((hexfloat_lit, int_or_float))(b)
}

fn hexfloat_lit(b: Buf) -> ParseResult<Value> {
    let (i, is_neg) = opt(char_is('-'))(b)?;
    let (i, int_v) = preceded(tag("0x"), many1(hexdig))(i)?;
    let (i, float_v) = opt(preceded(char_is('.'), many1(hexdig)))(i)?;
    let (i, exp) = preceded(char_is('p'), exponent)(i)?;
    let int_s: String = int_v.into_iter().collect();
    let float_s: String = float_v.map(|v| v.into_iter().collect()).unwrap_or_default();
    match hexfloat::assemble(is_neg.is_some(), &int_s, &float_s, &exp) {
        Ok(val) => Ok((i, Value::Float(val))),
        Err(_) => parse_err!(i, ErrorKind::HexDigit),
    }
}

fn fraction(b: Buf) -> ParseResult<String> {
    let (i, digits) = many1(digit)(b)?;
    Ok((i, String::from_iter(digits)))
}

fn exponent(b: Buf) -> ParseResult<String> {
    let (i, sign) = opt(alt((char_is('+'), char_is('-'))))(b)?;
    let sign = sign.unwrap_or('+');
    let (i, digits) = many1(digit)(i)?;
    let mut s = String::from_iter(digits);
    s.insert(0, sign);
    Ok((i, s))
}

fn text(b: Buf) -> ParseResult<Value> {
    let (i, chars_v) = delimited(char_is('"'), many0(schar), char_is('"'))(b)?;
    Ok((i, Value::Tstr(chars_v.into_iter().collect())))
}

fn bytes(b: Buf) -> ParseResult<Value> {
    let (i, may_qual) = opt(bsqual)(b)?;
    let (i, bytes_v) = delimited(char_is('\''), many0(bchar), char_is('\''))(i)?;
    let bytes_str: String = bytes_v.into_iter().collect();
    match may_qual {
        None => Ok((i, Value::Bytes(bytes_str.into_bytes()))),
        Some(BsQual::ByteStr) => match hex::decode(&bytes_str) {
            Ok(v) => Ok((i, Value::Bytes(v))),
            Err(_) => parse_err!(i, ErrorKind::Many0),
        },
        Some(BsQual::Base64) => match base64::decode_engine(
            &bytes_str,
            &base64::engine::fast_portable::FastPortable::from(
                &base64::alphabet::URL_SAFE,
                base64::engine::fast_portable::PAD,
            ),
        ) {
            Ok(v) => Ok((i, Value::Bytes(v))),
            Err(_) => parse_err!(i, ErrorKind::Many0),
        },
    }
}

fn bsqual(b: Buf) -> ParseResult<BsQual> {
    let (i, matched) = alt((tag("b64"), tag("h")))(b)?;
    match matched {
        "h" => Ok((i, BsQual::ByteStr)),
        _ => Ok((i, BsQual::Base64)),
    }
}

fn id(b: Buf) -> ParseResult<String> {
    let seps = many0(alt((tag("-"), tag("."))));
    let alpha_or_digit = alt((ealpha, digit));
    let (i, first) = ealpha(b)?;
    let (i, rest) = many0(tuple((seps, alpha_or_digit)))(i)?;
    let mut rest_str: String = first.to_string();
    for (sxs, ch) in rest {
        for sep in sxs {
            rest_str.push_str(sep);
        }
        rest_str.push(ch);
    }
    Ok((i, rest_str))
}

fn typename(b: Buf) -> ParseResult<String> {
    id(b)
}

fn groupname(b: Buf) -> ParseResult<String> {
    id(b)
}

fn bareword(b: Buf) -> ParseResult<String> {
    id(b)
}

fn schar(b: Buf) -> ParseResult<char> {
    let is_range = char_pred(|c| matches!(c,
        '\u{0020}' | '\u{0021}' | '\u{0023}'..='\u{005b}' | '\u{005d}'..='\u{007e}' | '\u{0080}'..='\u{10fffd}'));
    alt((is_range, sesc))(b)
}

fn bchar(b: Buf) -> ParseResult<char> {
    let is_range = char_pred(|c| matches!(c,
        '\u{0020}'..='\u{0026}' | '\u{0028}'..='\u{005b}' | '\u{005d}'..='\u{007e}' | '\u{0080}'..='\u{10fffd}'));
    alt((is_range, sesc, crlf))(b)
}

fn sesc(b: Buf) -> ParseResult<char> {
    let (i, _) = char_is('\\')(b)?;
    char_pred(|c| matches!(c, '\u{0020}'..='\u{007e}' | '\u{0080}'..='\u{10fffd}'))(i)
}

fn ealpha(b: Buf) -> ParseResult<char> {
    alt((alpha, char_is('@'), char_is('_'), char_is('$')))(b)
}

fn alpha(b: Buf) -> ParseResult<char> {
    char_pred(|c| c.is_ascii_alphabetic())(b)
}

fn digit(b: Buf) -> ParseResult<char> {
    char_pred(|c| c.is_ascii_digit())(b)
}

fn digit1(b: Buf) -> ParseResult<char> {
    char_pred(|c| ('1'..='9').contains(&c))(b)
}

fn hexdig(b: Buf) -> ParseResult<char> {
    char_pred(|c| c.is_ascii_hexdigit())(b)
}

fn bindig(b: Buf) -> ParseResult<char> {
    alt((char_is('0'), char_is('1')))(b)
}

fn optcom(b: Buf) -> ParseResult<()> {
    let (i, _) = s(b)?;
    let (i, _) = opt(preceded(char_is(','), s))(i)?;
    Ok((i, ()))
}

fn s(b: Buf) -> ParseResult<()> {
    let (i, _) = many0(char_pred(|c| c.is_whitespace()))(b)?;
    Ok((i, ()))
}

fn crlf(b: Buf) -> ParseResult<char> {
    let (i, _) = alt((tag("\u{000A}"), tag("\u{000D}\u{000A}")))(b)?;
    Ok((i, '\u{000A}'))
}

fn char_pred<C>(pred: C) -> impl Fn(Buf) -> ParseResult<char>
where
    C: Fn(char) -> bool,
{
    move |b: Buf| match b.iter_elements().next() {
        Some(c) if pred(c.as_char()) => Ok((b.slice(c.len()..), c.as_char())),
        _ => Err(Err::Error(NomParseError::from_char(b, ' '))),
    }
}

fn char_is(c: char) -> impl Fn(Buf) -> ParseResult<char> {
    move |b: Buf| match b.iter_elements().next() {
        Some(m) if m.as_char() == c => Ok((b.slice(c.len_utf8()..), c)),
        _ => Err(Err::Error(NomParseError::from_char(b, c))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rangeop_t() {
        assert_eq!(rangeop("..3"), Ok(("3", Operator::RangeIncl)));
        assert_eq!(rangeop("...3"), Ok(("3", Operator::RangeExcl)));
    }

    #[test]
    fn occur_t() {
        assert_eq!(occur("*foobar"), Ok(("foobar", Occurs::ZeroPlus)));
        assert_eq!(occur("3*foobar"), Ok(("foobar", Occurs::Between(3, i64::MAX))));
        assert_eq!(occur("?foobar"), Ok(("foobar", Occurs::Optional)));
        assert_eq!(occur("+foobar"), Ok(("foobar", Occurs::OnePlus)));
        assert_eq!(occur("0*1foobar"), Ok(("foobar", Occurs::Optional)));
    }

    #[test]
    fn value_t() {
        assert_eq!(value("123 abc"), Ok((" abc", Value::Int(123))));
        assert_eq!(value("true,"), Ok((",", Value::Bool(true))));
        assert_eq!(
            value("\"hi\"abc"),
            Ok(("abc", Value::Tstr("hi".to_string())))
        );
    }

    #[test]
    fn type_rule_body_primitive() {
        let (rest, t) = type_rule_body("uint").unwrap();
        assert_eq!(rest, "");
        assert_eq!(t, Type::Rule("uint".to_string()));
    }

    #[test]
    fn type_rule_body_range() {
        let (_, t) = type_rule_body("-128..127").unwrap();
        match t {
            Type::Combined(a, b, Operator::RangeIncl) => {
                assert_eq!(*a, Type::Value(Value::Int(-128)));
                assert_eq!(*b, Type::Value(Value::Int(127)));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn type_rule_body_control_size() {
        let (_, t) = type_rule_body("bstr .size 4").unwrap();
        match t {
            Type::Combined(a, _, Operator::Control(name, arg)) => {
                assert_eq!(*a, Type::Rule("bstr".to_string()));
                assert_eq!(name, "size");
                assert_eq!(arg, Some(Box::new(Type::Value(Value::Int(4)))));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn type_rule_body_union() {
        let (_, t) = type_rule_body("1 / 2 / 3").unwrap();
        match t {
            Type::Types(v) => assert_eq!(v.len(), 3),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn group_rule_body_map() {
        let (_, g) = group_rule_body("a: uint, b: tstr").unwrap();
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn id_t() {
        assert_eq!(id("abc-x.foo31 "), Ok((" ", "abc-x.foo31".to_string())));
    }
}
