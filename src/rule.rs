//! Ground rules of the generated logic program.
//!
//! Only the two rule types of the smodels internal format that the encoders
//! need are represented: basic rules (type `1`, which also covers facts and
//! integrity constraints) and choice rules (type `3`). See `lparse.pdf`,
//! pp. 86-88, for the format.

use std::fmt::{self, Display, Formatter, Write};

use crate::lit::Lit;
use crate::types::Atom;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Rule {
    /// `head :- body.` An integrity rule has the [`Atom::FALSE`] head.
    Basic { head: Atom, body: Box<[Lit]> },
    /// `{heads} :- body.`
    Choice { heads: Box<[Atom]>, body: Box<[Lit]> },
}

// Constructors
impl Rule {
    pub fn basic(head: Atom, body: &[Lit]) -> Rule {
        Rule::Basic {
            head,
            body: body.into(),
        }
    }

    pub fn fact(head: Atom) -> Rule {
        Rule::basic(head, &[])
    }

    /// A rule without head: the body must not hold.
    pub fn integrity(body: &[Lit]) -> Rule {
        Rule::basic(Atom::FALSE, body)
    }

    pub fn choice(heads: &[Atom]) -> Rule {
        Rule::Choice {
            heads: heads.into(),
            body: Box::new([]),
        }
    }
}

// Getters
impl Rule {
    pub fn body(&self) -> &[Lit] {
        match self {
            Rule::Basic { body, .. } => body,
            Rule::Choice { body, .. } => body,
        }
    }

    pub fn is_integrity(&self) -> bool {
        matches!(self, Rule::Basic { head, .. } if *head == Atom::FALSE)
    }
}

// Serialization
impl Rule {
    /// Writes the rule as one line of the smodels internal format (without the newline).
    pub fn write_smodels(&self, w: &mut impl Write) -> fmt::Result {
        match self {
            Rule::Basic { head, body } => {
                // 1 head #literals #negative [negative] [positive]
                write!(w, "1 {} ", head.id())?;
                write_body(w, body)
            }
            Rule::Choice { heads, body } => {
                // 3 #heads [heads] #literals #negative [negative] [positive]
                write!(w, "3 {}", heads.len())?;
                for head in heads.iter() {
                    write!(w, " {}", head.id())?;
                }
                write!(w, " ")?;
                write_body(w, body)
            }
        }
    }
}

fn write_body(w: &mut impl Write, body: &[Lit]) -> fmt::Result {
    let negative = body.iter().filter(|l| l.is_negated());
    let positive = body.iter().filter(|l| !l.is_negated());
    write!(w, "{} {}", body.len(), negative.clone().count())?;
    for lit in negative.chain(positive) {
        write!(w, " {}", lit.atom().id())?;
    }
    Ok(())
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Basic { head, .. } if *head != Atom::FALSE => write!(f, "{}", head)?,
            Rule::Basic { .. } => {}
            Rule::Choice { heads, .. } => {
                write!(f, "{{")?;
                for (i, head) in heads.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", head)?;
                }
                write!(f, "}}")?;
            }
        }
        let body = self.body();
        if !body.is_empty() {
            if !self.is_integrity() {
                write!(f, " ")?;
            }
            write!(f, ":- ")?;
            for (i, lit) in body.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", lit)?;
            }
        }
        write!(f, ".")
    }
}
