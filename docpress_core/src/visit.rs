//! Depth-first, pre-order traversal.
//!
//! Every pass is built from these functions. The visitor is called on a
//! matching node before its children are walked, and the children walked are
//! the ones present once the visitor returns, so a visitor may rewrite the
//! subtree below the node it is given (or replace the node outright).

use std::convert::Infallible;

use crate::Element;
use crate::Node;

/// What the traversal does after a node was visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visit {
	/// Walk the node's children next.
	#[default]
	Continue,
	/// Do not descend into the node's children.
	SkipChildren,
}

/// Call `visitor` on every node (the root included) for which `test` holds.
pub fn visit<T, F>(tree: &mut Node, test: T, mut visitor: F)
where
	T: Fn(&Node) -> bool,
	F: FnMut(&mut Node) -> Visit,
{
	let result: Result<(), Infallible> = try_visit(tree, &test, &mut |node| Ok(visitor(node)));
	match result {
		Ok(()) => {}
		Err(never) => match never {},
	}
}

/// Fallible [`visit`]: the first error stops the traversal and is returned.
pub fn try_visit<T, F, E>(tree: &mut Node, test: &T, visitor: &mut F) -> Result<(), E>
where
	T: Fn(&Node) -> bool + ?Sized,
	F: FnMut(&mut Node) -> Result<Visit, E> + ?Sized,
{
	let control = if test(tree) {
		visitor(tree)?
	} else {
		Visit::Continue
	};

	if control == Visit::SkipChildren {
		return Ok(());
	}

	if let Some(children) = tree.children_mut() {
		for child in children {
			try_visit(child, test, visitor)?;
		}
	}

	Ok(())
}

/// Call `visitor` on every element for which `test` holds.
pub fn visit_elements<T, F>(tree: &mut Node, test: T, mut visitor: F)
where
	T: Fn(&Element) -> bool,
	F: FnMut(&mut Element) -> Visit,
{
	let result: Result<(), Infallible> =
		try_visit_elements(tree, test, |element| Ok(visitor(element)));
	match result {
		Ok(()) => {}
		Err(never) => match never {},
	}
}

/// Fallible [`visit_elements`].
pub fn try_visit_elements<T, F, E>(tree: &mut Node, test: T, mut visitor: F) -> Result<(), E>
where
	T: Fn(&Element) -> bool,
	F: FnMut(&mut Element) -> Result<Visit, E>,
{
	let matches_element = |node: &Node| matches!(node, Node::Element(element) if test(element));
	try_visit(tree, &matches_element, &mut |node: &mut Node| {
		match node {
			Node::Element(element) => visitor(element),
			Node::Root(_) | Node::Text(_) => Ok(Visit::Continue),
		}
	})
}
