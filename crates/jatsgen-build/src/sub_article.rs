//! Peer review sub-articles.

use jatsgen_core::Article;
use jatsgen_xml::Element;

use crate::{
    BuildError, BuildOptions, ContribLinks, body_element, contrib_element, doi_article_id,
    related_object_elements, title_group_element,
};

/// Build a `sub-article` with its own `front-stub` and optional body.
///
/// Sub-articles share no identifier state with the enclosing document.
pub fn sub_article_element(article: &Article, options: &BuildOptions) -> Result<Element, BuildError> {
    let mut sub_article = Element::new("sub-article");
    if let Some(article_type) = &article.article_type {
        sub_article.set_attr("article-type", article_type.as_str());
    }
    if let Some(id) = &article.id {
        sub_article.set_attr("id", id.as_str());
    }

    let front_stub = sub_article.sub_element("front-stub");
    if let Some(doi) = &article.doi {
        front_stub.push(doi_article_id(doi));
    }
    front_stub.push(title_group_element(article)?);

    if !article.contributors.is_empty() {
        let links = ContribLinks {
            inline_affiliations: true,
            ..ContribLinks::default()
        };
        let group = front_stub.sub_element("contrib-group");
        for contributor in &article.contributors {
            group.push(contrib_element(contributor, &links, options));
        }
    }

    for object in related_object_elements(article) {
        front_stub.push(object);
    }

    if let Some(body) = body_element(article, options.max_content_depth)? {
        sub_article.push(body);
    }

    Ok(sub_article)
}
