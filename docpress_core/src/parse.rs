//! Lowering of MDX source into the content tree.

use markdown::Constructs;
use markdown::ParseOptions;
use markdown::mdast;
use markdown::to_mdast;

use crate::DocpressError;
use crate::DocpressResult;
use crate::Element;
use crate::Node;
use crate::PropertyValue;

/// The property holding a fence's metadata string (everything after the
/// language on the opening fence line).
pub const META: &str = "data-meta";

/// MDX with the GFM extensions enabled.
pub fn parse_options() -> ParseOptions {
	ParseOptions {
		constructs: Constructs {
			gfm_autolink_literal: true,
			gfm_footnote_definition: true,
			gfm_label_start_footnote: true,
			gfm_strikethrough: true,
			gfm_table: true,
			gfm_task_list_item: true,
			..Constructs::mdx()
		},
		..ParseOptions::mdx()
	}
}

/// Parse a document body into a content tree rooted at [`Node::Root`].
pub fn parse_document(content: impl AsRef<str>) -> DocpressResult<Node> {
	let mdast = to_mdast(content.as_ref(), &parse_options())
		.map_err(|e| DocpressError::Markdown(e.to_string()))?;
	let mut children = vec![];
	lower(&mdast, &mut children, false);

	Ok(Node::root(children))
}

fn lower_children(children: &[mdast::Node], out: &mut Vec<Node>, tight: bool) {
	for child in children {
		lower(child, out, tight);
	}
}

fn element(tag_name: &str, children: &[mdast::Node]) -> Element {
	let mut lowered = vec![];
	lower_children(children, &mut lowered, false);
	Element::new(tag_name).with_children(lowered)
}

/// `tight` is set for the children of list items in a tight list, whose
/// paragraphs are unwrapped.
fn lower(node: &mdast::Node, out: &mut Vec<Node>, tight: bool) {
	match node {
		mdast::Node::Root(root) => lower_children(&root.children, out, false),
		mdast::Node::Paragraph(paragraph) => {
			if tight {
				lower_children(&paragraph.children, out, false);
			} else {
				out.push(element("p", &paragraph.children).into());
			}
		}
		mdast::Node::Heading(heading) => {
			let tag_name = format!("h{}", heading.depth.clamp(1, 6));
			out.push(element(&tag_name, &heading.children).into());
		}
		mdast::Node::Text(text) => out.push(Node::text(&text.value)),
		mdast::Node::Emphasis(emphasis) => out.push(element("em", &emphasis.children).into()),
		mdast::Node::Strong(strong) => out.push(element("strong", &strong.children).into()),
		mdast::Node::Delete(delete) => out.push(element("del", &delete.children).into()),
		mdast::Node::Blockquote(quote) => out.push(element("blockquote", &quote.children).into()),
		mdast::Node::InlineCode(code) => {
			out.push(Element::new("code").with_child(Node::text(&code.value)).into());
		}
		mdast::Node::Code(code) => out.push(lower_code(code).into()),
		mdast::Node::List(list) => out.push(lower_list(list).into()),
		mdast::Node::ListItem(item) => out.push(lower_list_item(item, false).into()),
		mdast::Node::Link(link) => {
			let mut anchor = element("a", &link.children).with_property("href", link.url.as_str());
			if let Some(title) = &link.title {
				anchor = anchor.with_property("title", title.as_str());
			}
			out.push(anchor.into());
		}
		mdast::Node::Image(image) => {
			let mut img = Element::new("img")
				.with_property("src", image.url.as_str())
				.with_property("alt", image.alt.as_str());
			if let Some(title) = &image.title {
				img = img.with_property("title", title.as_str());
			}
			out.push(img.into());
		}
		mdast::Node::Table(table) => out.push(lower_table(table).into()),
		mdast::Node::Break(_) => out.push(Element::new("br").into()),
		mdast::Node::ThematicBreak(_) => out.push(Element::new("hr").into()),
		mdast::Node::MdxJsxFlowElement(jsx) => {
			lower_jsx(jsx.name.as_deref(), &jsx.attributes, &jsx.children, out);
		}
		mdast::Node::MdxJsxTextElement(jsx) => {
			lower_jsx(jsx.name.as_deref(), &jsx.attributes, &jsx.children, out);
		}
		mdast::Node::MdxjsEsm(esm) => {
			tracing::debug!(value = %esm.value, "dropping MDX module statement");
		}
		mdast::Node::MdxFlowExpression(expression) => {
			tracing::debug!(value = %expression.value, "dropping MDX expression");
		}
		mdast::Node::MdxTextExpression(expression) => {
			tracing::debug!(value = %expression.value, "dropping MDX expression");
		}
		mdast::Node::Html(html) => {
			tracing::debug!(value = %html.value, "dropping raw HTML");
		}
		mdast::Node::Yaml(_) | mdast::Node::Toml(_) | mdast::Node::Definition(_) => {}
		other => {
			if let Some(children) = other.children() {
				lower_children(children, out, false);
			} else {
				let text = other.to_string();
				if !text.is_empty() {
					out.push(Node::text(text));
				}
			}
		}
	}
}

fn lower_code(code: &mdast::Code) -> Element {
	let mut code_element = Element::new("code");
	if let Some(lang) = code.lang.as_deref().filter(|lang| !lang.is_empty()) {
		code_element = code_element.with_class(format!("language-{lang}"));
	}
	if let Some(meta) = code.meta.as_deref().filter(|meta| !meta.is_empty()) {
		code_element = code_element.with_property(META, meta);
	}
	if !code.value.is_empty() {
		code_element = code_element.with_child(Node::text(&code.value));
	}

	Element::new("pre").with_child(code_element)
}

fn lower_list(list: &mdast::List) -> Element {
	let tight = !list.spread
		&& !list.children.iter().any(|child| {
			matches!(child, mdast::Node::ListItem(item) if item.spread)
		});
	let mut element = Element::new(if list.ordered { "ol" } else { "ul" });
	if let Some(start) = list.start.filter(|start| list.ordered && *start != 1) {
		element = element.with_property("start", start.to_string());
	}

	for child in &list.children {
		match child {
			mdast::Node::ListItem(item) => element.children.push(lower_list_item(item, tight).into()),
			other => lower(other, &mut element.children, tight),
		}
	}

	element
}

fn lower_list_item(item: &mdast::ListItem, tight: bool) -> Element {
	let mut element = Element::new("li");
	if let Some(checked) = item.checked {
		element = element.with_class("task-list-item").with_child(
			Element::new("input")
				.with_property("type", "checkbox")
				.with_property("checked", checked)
				.with_property("disabled", true),
		);
	}
	lower_children(&item.children, &mut element.children, tight);

	element
}

fn lower_table(table: &mdast::Table) -> Element {
	let mut head = Element::new("thead");
	let mut body = Element::new("tbody");

	for (index, row) in table.children.iter().enumerate() {
		let mdast::Node::TableRow(row) = row else {
			continue;
		};
		let cell_tag = if index == 0 { "th" } else { "td" };
		let mut tr = Element::new("tr");
		for (column, cell) in row.children.iter().enumerate() {
			let mut cell_element = Element::new(cell_tag);
			if let mdast::Node::TableCell(cell) = cell {
				lower_children(&cell.children, &mut cell_element.children, false);
			}
			let align = match table.align.get(column) {
				Some(mdast::AlignKind::Left) => Some("left"),
				Some(mdast::AlignKind::Right) => Some("right"),
				Some(mdast::AlignKind::Center) => Some("center"),
				Some(mdast::AlignKind::None) | None => None,
			};
			if let Some(align) = align {
				cell_element = cell_element.with_property("align", align);
			}
			tr.children.push(cell_element.into());
		}

		if index == 0 {
			head.children.push(tr.into());
		} else {
			body.children.push(tr.into());
		}
	}

	let mut element = Element::new("table").with_child(head);
	if !body.children.is_empty() {
		element = element.with_child(body);
	}
	element
}

/// JSX elements keep their name as the tag. Literal attributes become string
/// properties, valueless attributes become `true` and expression values keep
/// their source text. Fragments are spliced in place.
fn lower_jsx(
	name: Option<&str>,
	attributes: &[mdast::AttributeContent],
	children: &[mdast::Node],
	out: &mut Vec<Node>,
) {
	let Some(name) = name else {
		lower_children(children, out, false);
		return;
	};

	let mut jsx = element(name, children);
	for attribute in attributes {
		match attribute {
			mdast::AttributeContent::Property(property) => {
				let value: PropertyValue = match &property.value {
					None => true.into(),
					Some(mdast::AttributeValue::Literal(value)) => value.as_str().into(),
					Some(mdast::AttributeValue::Expression(expression)) => {
						expression.value.as_str().into()
					}
				};
				jsx.properties.insert(property.name.clone(), value);
			}
			mdast::AttributeContent::Expression(expression) => {
				tracing::debug!(component = name, value = %expression.value, "dropping spread attribute");
			}
		}
	}

	out.push(jsx.into());
}
