//! Document assembly.

use jatsgen_core::{Article, Config, EDITOR};
use jatsgen_xml::{DEFAULT_NAMESPACES, Doctype, Element, EmitError, SerializeOptions, to_bytes};

use crate::{
    BuildContext, BuildError, BuildOptions, ContribLinks, abstract_element, aff_element,
    article_categories_element, article_id_elements, author_keywords_element,
    author_notes_element, body_element, competing_interest_element, contrib_award_ids,
    contrib_element, elocation_id_element, ethics_element, funding_group_element,
    history_element, journal_meta_element, permissions_element, pub_date_element,
    pub_history_element, research_organism_element, set_article_datasets, sub_article_element,
    title_group_element, volume_element,
};

/// `dtd-version` of generated documents.
pub const DTD_VERSION: &str = "1.1d3";

/// Public identifier of the JATS archiving DTD.
pub const DOCTYPE_PUBLIC_ID: &str =
    "-//NLM//DTD JATS (Z39.96) Journal Archiving and Interchange DTD v1.1d3 20150301//EN";

/// System identifier of the JATS archiving DTD.
pub const DOCTYPE_SYSTEM_ID: &str = "JATS-archivearticle1.dtd";

/// The document type declaration of generated documents.
pub fn jats_doctype() -> Doctype {
    Doctype {
        name: "article".to_string(),
        public_id: DOCTYPE_PUBLIC_ID.to_string(),
        system_id: DOCTYPE_SYSTEM_ID.to_string(),
    }
}

/// A fully built article document.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleXml {
    root: Element,
}

impl ArticleXml {
    /// Build the document tree for `article`.
    ///
    /// Fails without producing a tree when the record is insufficient,
    /// when a free-text field holds malformed markup or when content is
    /// nested too deeply.
    pub fn build(
        article: &Article,
        config: &Config,
        options: &BuildOptions,
    ) -> Result<Self, BuildError> {
        let missing = article.missing_fields();
        if !missing.is_empty() {
            return Err(BuildError::InsufficientInput(missing));
        }
        let root = ArticleBuilder::new(article, config, options).build()?;
        Ok(Self { root })
    }

    /// The root `article` element.
    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn into_root(self) -> Element {
        self.root
    }

    /// Serialize with the XML declaration and JATS doctype.
    pub fn output_xml(&self, pretty: bool) -> Result<Vec<u8>, EmitError> {
        let options = SerializeOptions {
            doctype: Some(jats_doctype()),
            pretty,
            ..SerializeOptions::default()
        };
        to_bytes(&self.root, &options)
    }
}

/// Drives the element builders over one article, owning the build state.
struct ArticleBuilder<'a> {
    article: &'a Article,
    config: &'a Config,
    options: &'a BuildOptions,
    context: BuildContext,
}

impl<'a> ArticleBuilder<'a> {
    fn new(article: &'a Article, config: &'a Config, options: &'a BuildOptions) -> Self {
        Self {
            article,
            config,
            options,
            context: BuildContext::new(article),
        }
    }

    fn build(mut self) -> Result<Element, BuildError> {
        let mut root = Element::new("article");
        if let Some(article_type) = &self.article.article_type {
            root.set_attr("article-type", article_type.as_str());
        }
        for (prefix, uri) in DEFAULT_NAMESPACES {
            root.set_attr(format!("xmlns:{prefix}"), uri);
        }
        root.set_attr("dtd-version", DTD_VERSION);

        if let Some(provenance) = &self.options.provenance {
            root.push_comment(provenance.comment());
        }

        root.push(self.front()?);
        if let Some(body) = body_element(self.article, self.options.max_content_depth)? {
            root.push(body);
        }
        root.push(self.back()?);

        for sub_article in &self.article.sub_articles {
            root.push(sub_article_element(sub_article, self.options)?);
        }

        Ok(root)
    }

    fn front(&mut self) -> Result<Element, BuildError> {
        let mut front = Element::new("front");
        front.push(journal_meta_element(self.config));
        front.push(self.article_meta()?);
        Ok(front)
    }

    fn article_meta(&mut self) -> Result<Element, BuildError> {
        let (article, config) = (self.article, self.config);
        let mut meta = Element::new("article-meta");

        for id in article_id_elements(article) {
            meta.push(id);
        }
        if let Some(categories) = article_categories_element(article) {
            meta.push(categories);
        }
        meta.push(title_group_element(article)?);

        for contrib_type in config.contrib_types() {
            self.set_contrib_group(&mut meta, contrib_type);
        }

        if let Some(notes) = author_notes_element(article, &self.context) {
            meta.push(notes);
        }
        if let Some(pub_date) = pub_date_element(article) {
            meta.push(pub_date);
        }
        if let Some(volume) = volume_element(article) {
            meta.push(volume);
        }
        if let Some(elocation_id) = elocation_id_element(article) {
            meta.push(elocation_id);
        }
        if let Some(history) = history_element(article, config.history_date_types()) {
            meta.push(history);
        }
        if let Some(pub_history) = pub_history_element(article) {
            meta.push(pub_history);
        }
        if let Some(permissions) = permissions_element(article) {
            meta.push(permissions);
        }
        meta.push(abstract_element(article)?);

        if self.options.author_keywords
            && let Some(keywords) = author_keywords_element(article)
        {
            meta.push(keywords);
        }
        if let Some(organisms) = research_organism_element(article)? {
            meta.push(organisms);
        }
        if let Some(funding) = funding_group_element(article) {
            meta.push(funding);
        }

        Ok(meta)
    }

    /// One `contrib-group` for the contributors of `contrib_type`.
    ///
    /// Editors carry their affiliations inline. Other groups reference
    /// shared affiliation ids and are followed by the `aff` elements
    /// first allocated while building them.
    fn set_contrib_group(&mut self, parent: &mut Element, contrib_type: &str) {
        let article = self.article;
        let editors = contrib_type == EDITOR;
        let first_new_aff = self.context.affiliation_count() + 1;

        let mut group = Element::new("contrib-group");
        if editors {
            group.set_attr("content-type", "section");
        }

        for (index, contributor) in article.contributors.iter().enumerate() {
            if contributor.contrib_type != contrib_type {
                continue;
            }
            let links = if editors {
                ContribLinks {
                    inline_affiliations: true,
                    corresp_id: self.context.corresp_id(index),
                    award_ids: contrib_award_ids(&article.funding_awards, contributor.auth_id.as_deref()),
                    ..ContribLinks::default()
                }
            } else {
                ContribLinks {
                    inline_affiliations: false,
                    aff_ids: contributor
                        .affiliations
                        .iter()
                        .map(|aff| self.context.aff_id(aff))
                        .collect(),
                    corresp_id: self.context.corresp_id(index),
                    award_ids: contrib_award_ids(&article.funding_awards, contributor.auth_id.as_deref()),
                    conflict_ids: self.context.conflict_refs(index),
                }
            };
            group.push(contrib_element(contributor, &links, self.options));
        }

        if !editors {
            for aff_id in first_new_aff..=self.context.affiliation_count() {
                if let Some(affiliation) = self.context.affiliation(aff_id) {
                    let id = format!("aff{aff_id}");
                    group.push(aff_element(affiliation, Some(&id), false, self.options));
                }
            }
        }

        parent.push(group);
    }

    fn back(&mut self) -> Result<Element, BuildError> {
        let article = self.article;
        let mut back = Element::new("back");

        let info = self.section(&mut back, "additional-information");
        info.text_element("title", "Additional information");
        if let Some(conflicts) = competing_interest_element(article, &self.context)? {
            info.push(conflicts);
        }
        if let Some(ethics) = ethics_element(article)? {
            info.push(ethics);
        }

        if !article.datasets.is_empty() || article.data_availability.is_some() {
            let mut supplementary = self.new_section("supplementary-material");
            supplementary.text_element("title", "Additional Files");
            let mut data = self.new_section("data-availability");
            set_article_datasets(&mut data, article, &mut self.context, self.options.dataset_style)?;
            supplementary.push(data);
            back.push(supplementary);
        }

        Ok(back)
    }

    fn new_section(&mut self, sec_type: &str) -> Element {
        Element::new("sec")
            .attr("id", self.context.next_section_id())
            .attr("sec-type", sec_type)
    }

    fn section<'e>(&mut self, parent: &'e mut Element, sec_type: &str) -> &'e mut Element {
        let section = self.new_section(sec_type);
        parent.push(section)
    }
}
