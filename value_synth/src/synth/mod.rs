//! Synthesis pipeline.
//!
//! A [`Synthesizer`] classifies every field of a [`Schema`], applies the
//! null-enforcement policy, resolves convenience names, and hands the
//! analysed fields to the accessor, value, and builder assemblers. Each schema
//! is synthesized independently; batch runs collect failures without
//! aborting.

mod accessors;
mod builder;
mod report;
mod value;

#[cfg(test)]
mod tests;

use tracing::{debug, info, warn};

use crate::classify::{Category, classify};
use crate::config::SynthesisConfig;
use crate::error::{SchemaError, SchemaErrors, SynthResult, SynthesisError};
use crate::naming::{EnglishInflector, NamingResolver, Singularize};
use crate::plan::{ContainerKind, EmissionPlan, IR_VERSION, MethodKind, MethodRef, Shape};
use crate::policy::NullPolicy;
use crate::schema::{Declaration, FieldSpec, OptionalFlavor, Schema, TypeNames};

pub use report::{Diagnostic, SynthesisReport};

/// One field after classification and policy resolution.
#[derive(Debug, Clone)]
pub(crate) struct FieldInfo<'a> {
    pub spec: &'a FieldSpec,
    pub category: Category<'a>,
    pub policy: NullPolicy,
    /// Per-item adder/putter stem, when one is available.
    pub singular: Option<String>,
    /// Scratch local holding a copied container.
    pub scratch: String,
    /// Loop variables for element and entry checks.
    pub item: String,
    pub entry: String,
}

impl FieldInfo<'_> {
    pub(crate) fn name(&self) -> &str {
        &self.spec.name
    }

    pub(crate) const fn is_enforced(&self) -> bool {
        self.policy.is_enforced()
    }

    pub(crate) fn exact_shape(&self) -> Shape {
        Shape::exact(self.spec.ty.clone())
    }

    /// Concrete storage kind for collection and map fields.
    pub(crate) fn container(&self) -> Option<ContainerKind> {
        match self.category {
            Category::Collection { kind, .. } => Some(kind.into()),
            Category::Map { .. } => Some(ContainerKind::Map),
            Category::Scalar(_) | Category::Reference { .. } | Category::Optional { .. } => None,
        }
    }

    pub(crate) const fn optional_flavor(&self) -> Option<OptionalFlavor> {
        match self.category {
            Category::Optional { flavor, .. } => Some(flavor),
            _ => None,
        }
    }

    /// The value type's accessor for this field.
    pub(crate) fn value_getter(&self) -> MethodRef {
        MethodRef::new(self.name(), MethodKind::ValueGetter)
    }
}

/// Locals shared by the value type's generated bodies.
#[derive(Debug, Clone)]
pub(crate) struct ValueLocals {
    pub other: String,
    pub that: String,
    pub result: String,
    pub temp: String,
}

/// Everything the assemblers read while building one plan.
#[derive(Debug)]
pub(crate) struct Context<'a> {
    pub config: &'a SynthesisConfig,
    pub names: &'a TypeNames,
    pub fields: Vec<FieldInfo<'a>>,
    pub has_explicit_to_builder: bool,
    pub is_public: bool,
    pub locals: ValueLocals,
}

impl Context<'_> {
    /// Name of the copy-constructor parameter.
    pub(crate) const SOURCE: &'static str = "v";

    pub(crate) fn builder_name(&self) -> &str {
        &self.names.builder
    }

    pub(crate) fn value_name(&self) -> &str {
        &self.config.value_type_name
    }

    pub(crate) fn mutator_ref(field: &FieldInfo<'_>, kind: MethodKind) -> MethodRef {
        MethodRef::new(field.name(), kind)
    }
}

/// Turns schemas into emission plans.
///
/// # Examples
///
/// ```
/// use value_synth::{FieldSpec, Schema, Synthesizer, TypeDescriptor, TypeNames};
///
/// let names = TypeNames::new("com.example", "Person", "PersonBuilder");
/// let schema = Schema::new(
///     names,
///     vec![FieldSpec::new("name", TypeDescriptor::string())],
/// )
/// .expect("valid schema");
/// let plan = Synthesizer::default().synthesize(&schema).expect("synthesized");
/// assert_eq!(plan.builder.name, "PersonBuilder");
/// assert!(plan.value().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Synthesizer<S = EnglishInflector> {
    config: SynthesisConfig,
    naming: NamingResolver<S>,
}

impl Synthesizer {
    /// A synthesizer using the built-in English inflector.
    #[must_use]
    pub fn new(config: SynthesisConfig) -> Self {
        let naming = NamingResolver::new(&config);
        Self { config, naming }
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new(SynthesisConfig::default())
    }
}

impl<S: Singularize> Synthesizer<S> {
    /// A synthesizer using a caller-supplied inflector.
    #[must_use]
    pub fn with_inflector(config: SynthesisConfig, inflector: S) -> Self {
        let naming = NamingResolver::with_inflector(&config, inflector);
        Self { config, naming }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Synthesizes the plan for one schema.
    ///
    /// # Errors
    ///
    /// Returns every reserved field name and unresolved type found in the
    /// schema, wrapped in one [`SynthesisError`].
    pub fn synthesize(&self, schema: &Schema) -> SynthResult<EmissionPlan> {
        let names = schema.names();
        let fields = self
            .analyze(schema.fields())
            .map_err(|errors| SynthesisError::new(&names.value, errors))?;
        let ctx = Context {
            config: &self.config,
            names,
            locals: self.value_locals(schema.fields()),
            fields,
            has_explicit_to_builder: schema.has_explicit_to_builder(),
            is_public: schema.is_public_visibility(),
        };

        let value_type = value::build_value_type(&ctx);
        let builder = builder::build_builder_type(&ctx, value_type);
        let plan = EmissionPlan {
            ir_version: IR_VERSION.to_owned(),
            package: names.package.clone(),
            value_type: names.value.clone(),
            builder,
        };
        info!(
            value_type = %names.qualified_value(),
            fields = ctx.fields.len(),
            members = plan.builder.member_count(),
            "synthesized schema"
        );
        Ok(plan)
    }

    /// Validates a declaration and synthesizes its plan.
    ///
    /// # Errors
    ///
    /// Returns the intake error, or the synthesis error, for the declaration.
    pub fn synthesize_declaration(&self, declaration: &Declaration) -> SynthResult<EmissionPlan> {
        let schema = declaration.to_schema(&self.config)?;
        self.synthesize(&schema)
    }

    /// Synthesizes every declaration, collecting failures per schema.
    pub fn synthesize_all<'d, I>(&self, declarations: I) -> SynthesisReport
    where
        I: IntoIterator<Item = &'d Declaration>,
    {
        let mut report = SynthesisReport::default();
        for declaration in declarations {
            match self.synthesize_declaration(declaration) {
                Ok(plan) => report.plans.push(plan),
                Err(error) => {
                    warn!(
                        schema = %error.schema,
                        problems = error.errors.len(),
                        "schema synthesis failed"
                    );
                    report.failures.push(error);
                }
            }
        }
        report
    }

    fn analyze<'a>(&self, specs: &'a [FieldSpec]) -> Result<Vec<FieldInfo<'a>>, SchemaErrors> {
        let mut errors = SchemaErrors::default();
        let mut fields = Vec::with_capacity(specs.len());
        let names: Vec<&str> = specs.iter().map(|f| f.name.as_str()).collect();
        for spec in specs {
            if self.naming.is_reserved(&spec.name) {
                errors.push(SchemaError::ReservedFieldName {
                    field: spec.name.clone(),
                });
                continue;
            }
            match classify(spec) {
                Ok(category) => fields.push(self.field_info(spec, category, &names)),
                Err(error) => errors.push(error),
            }
        }
        errors.into_result(fields)
    }

    fn field_info<'a>(
        &self,
        spec: &'a FieldSpec,
        category: Category<'a>,
        scope: &[&str],
    ) -> FieldInfo<'a> {
        let policy = NullPolicy::for_field(spec, &category);
        debug!(
            field = %spec.name,
            category = category.label(),
            policy = policy.as_str(),
            "classified field"
        );
        let singular = if category.is_container() {
            self.naming
                .resolve_singular(&spec.name)
                .inspect_err(|reason| {
                    debug!(
                        field = %spec.name,
                        reason = reason.as_str(),
                        "per-item method suppressed"
                    );
                })
                .ok()
        } else {
            None
        };
        let own = [spec.name.as_str()];
        FieldInfo {
            spec,
            category,
            policy,
            singular,
            scratch: self.naming.local_name(&format!("_{}", spec.name), scope),
            item: self.naming.local_name("item", &own),
            entry: self.naming.local_name("entry", &own),
        }
    }

    fn value_locals(&self, specs: &[FieldSpec]) -> ValueLocals {
        let scope: Vec<&str> = specs.iter().map(|f| f.name.as_str()).collect();
        ValueLocals {
            other: self.naming.local_name("o", &scope),
            that: self.naming.local_name("that", &scope),
            result: self.naming.local_name("result", &scope),
            temp: self.naming.local_name("temp", &scope),
        }
    }
}

/// Synthesizes `schema` with a default-configured [`Synthesizer`].
///
/// # Errors
///
/// See [`Synthesizer::synthesize`].
pub fn synthesize(schema: &Schema) -> SynthResult<EmissionPlan> {
    Synthesizer::default().synthesize(schema)
}

/// Synthesizes every declaration with `config`, collecting failures.
pub fn synthesize_all<'d, I>(declarations: I, config: SynthesisConfig) -> SynthesisReport
where
    I: IntoIterator<Item = &'d Declaration>,
{
    Synthesizer::new(config).synthesize_all(declarations)
}
