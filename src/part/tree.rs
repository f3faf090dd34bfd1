//! Part trees
//!
//! A part tree is the ordered sequence of parts of one repository method,
//! joined by AND/OR in declaration order, plus the method subject, an
//! optional result cap and a static `OrderBy` sort.

use std::fmt;

use super::part::Part;
use super::sort::Sort;

/// Join between two consecutive parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Join {
    And,
    Or,
}

impl Join {
    pub fn as_str(&self) -> &'static str {
        match self {
            Join::And => "AND",
            Join::Or => "OR",
        }
    }
}

/// What the method returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Find,
    Count,
}

/// Parts of one repository method
#[derive(Debug, Clone, PartialEq)]
pub struct PartTree {
    type_name: String,
    method_name: String,
    subject: Subject,
    parts: Vec<Part>,
    joins: Vec<Join>,
    order_by: Sort,
    max_results: Option<usize>,
}

impl PartTree {
    /// Starts a `find` tree for `type_name`
    pub fn find(type_name: impl Into<String>, method_name: impl Into<String>) -> PartTreeBuilder {
        PartTreeBuilder::new(Subject::Find, type_name.into(), method_name.into())
    }

    /// Starts a `count` tree for `type_name`
    pub fn count(type_name: impl Into<String>, method_name: impl Into<String>) -> PartTreeBuilder {
        PartTreeBuilder::new(Subject::Count, type_name.into(), method_name.into())
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// `Type.methodName`, the form used in error messages
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.type_name, self.method_name)
    }

    pub fn subject(&self) -> Subject {
        self.subject
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// `joins[i]` joins `parts[i]` and `parts[i + 1]`
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn order_by(&self) -> &Sort {
        &self.order_by
    }

    pub fn max_results(&self) -> Option<usize> {
        self.max_results
    }

    pub fn is_count(&self) -> bool {
        self.subject == Subject::Count
    }
}

impl fmt::Display for PartTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", self.joins[i - 1].as_str())?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

/// Builder for [`PartTree`]
#[derive(Debug)]
pub struct PartTreeBuilder {
    tree: PartTree,
}

impl PartTreeBuilder {
    fn new(subject: Subject, type_name: String, method_name: String) -> Self {
        Self {
            tree: PartTree {
                type_name,
                method_name,
                subject,
                parts: Vec::new(),
                joins: Vec::new(),
                order_by: Sort::unsorted(),
                max_results: None,
            },
        }
    }

    /// Appends a part joined with AND (the first part has no join)
    pub fn part(self, part: Part) -> Self {
        self.and(part)
    }

    /// Appends a part joined with AND
    pub fn and(self, part: Part) -> Self {
        self.push(Join::And, part)
    }

    /// Appends a part joined with OR
    pub fn or(self, part: Part) -> Self {
        self.push(Join::Or, part)
    }

    /// Static `OrderBy` clause
    pub fn order_by(mut self, sort: Sort) -> Self {
        self.tree.order_by = sort;
        self
    }

    /// `Top N` / `First N` result cap
    pub fn top(mut self, n: usize) -> Self {
        self.tree.max_results = Some(n);
        self
    }

    pub fn build(self) -> PartTree {
        self.tree
    }

    fn push(mut self, join: Join, part: Part) -> Self {
        if !self.tree.parts.is_empty() {
            self.tree.joins.push(join);
        }
        self.tree.parts.push(part);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::Keyword;

    fn part(source: &str, arg: &str) -> Part {
        Part::parse(source, vec![arg.into()]).unwrap()
    }

    #[test]
    fn test_joins_follow_declaration_order() {
        let tree = PartTree::find("Person", "findByFirstNameOrLastNameAndAge")
            .part(part("FirstName", "Dave"))
            .or(part("LastName", "Matthews"))
            .and(Part::new("Age", Keyword::SimpleProperty, vec![42.into()]).unwrap())
            .build();

        assert_eq!(tree.parts().len(), 3);
        assert_eq!(tree.joins(), &[Join::Or, Join::And]);
        assert_eq!(
            tree.to_string(),
            "FirstNameIs OR LastNameIs AND AgeIs"
        );
    }

    #[test]
    fn test_qualified_name() {
        let tree = PartTree::count("Person", "countByLastName")
            .part(part("LastName", "James"))
            .build();
        assert!(tree.is_count());
        assert_eq!(tree.qualified_name(), "Person.countByLastName");
    }

    #[test]
    fn test_top_and_order_by() {
        let tree = PartTree::find("Person", "findTop3ByLastNameOrderByAgeDesc")
            .part(part("LastName", "Moore"))
            .order_by(Sort::desc("age"))
            .top(3)
            .build();
        assert_eq!(tree.max_results(), Some(3));
        assert!(tree.order_by().is_sorted());
    }
}
