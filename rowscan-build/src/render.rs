//! Token renderers, one per generated function kind.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Ident, Type};

use crate::error::{Error, Result};
use crate::naming::{FunctionNames, to_snake_case};
use crate::scanner::RecordDescriptor;

/// Kind of a generated function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Scan,
    ScanPlural,
    Select,
    SelectPlural,
    Slice,
    Insert,
    Update,
}

/// One rendered function declaration.
#[derive(Debug, Clone)]
pub struct GeneratedFunction {
    pub name: String,
    pub kind: FunctionKind,
    pub tokens: TokenStream,
}

struct FieldContext {
    ident: Ident,
    ty: Type,
    column: String,
}

/// Everything the renderers need for one record, validated up front.
pub(crate) struct RecordContext {
    record: Ident,
    record_name: String,
    table: String,
    names: FunctionNames,
    scan_visibility: TokenStream,
    fields: Vec<FieldContext>,
}

impl RecordContext {
    pub(crate) fn new(record: &RecordDescriptor, unexport: bool) -> Result<Self> {
        let fields = record
            .fields
            .iter()
            .map(|field| {
                let ty = syn::parse_str::<Type>(&field.type_name).map_err(|err| {
                    Error::input(format!(
                        "field `{}.{}` has unparsable type `{}`: {err}",
                        record.name, field.name, field.type_name
                    ))
                })?;
                Ok(FieldContext {
                    ident: parse_ident(&field.name)?,
                    ty,
                    column: field.column().to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let scan_visibility = if unexport { quote!(pub(super)) } else { quote!(pub) };

        Ok(Self {
            record: parse_ident(&record.name)?,
            record_name: record.name.clone(),
            table: to_snake_case(&record.name),
            names: FunctionNames::new(&record.name, unexport),
            scan_visibility,
            fields,
        })
    }

    /// Render the functions for this record in emission order.
    pub(crate) fn render(&self, extra_helpers: bool) -> Result<Vec<GeneratedFunction>> {
        let mut functions = vec![self.render_scan()?, self.render_scan_plural()?];

        if extra_helpers {
            if self.fields.is_empty() {
                return Err(Error::input(format!(
                    "record `{}` has no fields; SQL helpers need an identity field",
                    self.record_name
                )));
            }
            functions.push(self.render_select()?);
            functions.push(self.render_select_plural()?);
            functions.push(self.render_slice()?);
            functions.push(self.render_insert()?);
            functions.push(self.render_update()?);
        }

        Ok(functions)
    }

    fn render_scan(&self) -> Result<GeneratedFunction> {
        let name = parse_ident(&self.names.scan)?;
        let record = &self.record;
        let vis = &self.scan_visibility;
        let doc = format!(
            " Scan one `{}` from a row, binding columns by position.",
            self.record_name
        );

        let binds = self.fields.iter().enumerate().map(|(ordinal, field)| {
            let ident = &field.ident;
            let ty = &field.ty;
            quote! { #ident: row.try_get::<#ty, usize>(#ordinal)? }
        });

        let tokens = quote! {
            #[doc = #doc]
            #vis fn #name(
                row: &::sqlx::postgres::PgRow,
            ) -> ::std::result::Result<#record, ::sqlx::Error> {
                ::std::result::Result::Ok(#record {
                    #(#binds,)*
                })
            }
        };

        Ok(self.function(FunctionKind::Scan, &self.names.scan, tokens))
    }

    fn render_scan_plural(&self) -> Result<GeneratedFunction> {
        let name = parse_ident(&self.names.scan_plural)?;
        let scan = parse_ident(&self.names.scan)?;
        let record = &self.record;
        let vis = &self.scan_visibility;
        let doc = format!(
            " Scan every row into a `{}`, stopping at the first error.",
            self.record_name
        );

        let tokens = quote! {
            #[doc = #doc]
            #vis fn #name(
                rows: &[::sqlx::postgres::PgRow],
            ) -> ::std::result::Result<::std::vec::Vec<#record>, ::sqlx::Error> {
                let mut records = ::std::vec::Vec::with_capacity(rows.len());
                for row in rows {
                    records.push(#scan(row)?);
                }
                ::std::result::Result::Ok(records)
            }
        };

        Ok(self.function(FunctionKind::ScanPlural, &self.names.scan_plural, tokens))
    }

    fn render_select(&self) -> Result<GeneratedFunction> {
        let name = parse_ident(&self.names.select)?;
        let scan = parse_ident(&self.names.scan)?;
        let record = &self.record;
        let identity = self.identity();
        let key_ty = &identity.ty;
        let sql = format!(
            "SELECT {} FROM \"{}\" WHERE \"{}\" = $1",
            self.column_list(),
            self.table,
            identity.column
        );
        let doc = format!(
            " Fetch one `{}` by `{}`. A missing row yields `sqlx::Error::RowNotFound`.",
            self.record_name, identity.column
        );

        let tokens = quote! {
            #[doc = #doc]
            pub async fn #name<'e, E>(
                executor: E,
                key: &#key_ty,
            ) -> ::std::result::Result<#record, ::sqlx::Error>
            where
                E: ::sqlx::PgExecutor<'e>,
            {
                let row = ::sqlx::query(#sql).bind(key).fetch_one(executor).await?;
                #scan(&row)
            }
        };

        Ok(self.function(FunctionKind::Select, &self.names.select, tokens))
    }

    fn render_select_plural(&self) -> Result<GeneratedFunction> {
        let name = parse_ident(&self.names.select_plural)?;
        let scan_plural = parse_ident(&self.names.scan_plural)?;
        let record = &self.record;
        let sql = format!("SELECT {} FROM \"{}\"", self.column_list(), self.table);
        let doc = format!(" Fetch every `{}` row.", self.record_name);

        let tokens = quote! {
            #[doc = #doc]
            pub async fn #name<'e, E>(
                executor: E,
            ) -> ::std::result::Result<::std::vec::Vec<#record>, ::sqlx::Error>
            where
                E: ::sqlx::PgExecutor<'e>,
            {
                let rows = ::sqlx::query(#sql).fetch_all(executor).await?;
                #scan_plural(&rows)
            }
        };

        Ok(self.function(FunctionKind::SelectPlural, &self.names.select_plural, tokens))
    }

    fn render_slice(&self) -> Result<GeneratedFunction> {
        let name = parse_ident(&self.names.slice)?;
        let record = &self.record;
        let doc = format!(" Bind the fields of a `{}` in declaration order.", self.record_name);

        let adds = self.fields.iter().map(|field| {
            let ident = &field.ident;
            quote! { args.add(&record.#ident).map_err(::sqlx::Error::Encode)?; }
        });

        let tokens = quote! {
            #[doc = #doc]
            fn #name(
                record: &#record,
            ) -> ::std::result::Result<::sqlx::postgres::PgArguments, ::sqlx::Error> {
                let mut args = ::sqlx::postgres::PgArguments::default();
                #(#adds)*
                ::std::result::Result::Ok(args)
            }
        };

        Ok(self.function(FunctionKind::Slice, &self.names.slice, tokens))
    }

    fn render_insert(&self) -> Result<GeneratedFunction> {
        let placeholders: Vec<String> = (1..=self.fields.len()).map(|i| format!("${i}")).collect();
        let sql = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({})",
            self.table,
            self.column_list(),
            placeholders.join(", ")
        );
        let doc = format!(" Insert a `{}`.", self.record_name);
        self.render_execute(FunctionKind::Insert, &self.names.insert, &sql, &doc)
    }

    fn render_update(&self) -> Result<GeneratedFunction> {
        let identity = self.identity();
        let assignments: Vec<String> = if self.fields.len() == 1 {
            vec![format!("\"{}\" = $1", identity.column)]
        } else {
            self.fields
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, field)| format!("\"{}\" = ${}", field.column, i + 1))
                .collect()
        };
        let sql = format!(
            "UPDATE \"{}\" SET {} WHERE \"{}\" = $1",
            self.table,
            assignments.join(", "),
            identity.column
        );
        let doc = format!(" Update a `{}`, matched on `{}`.", self.record_name, identity.column);
        self.render_execute(FunctionKind::Update, &self.names.update, &sql, &doc)
    }

    fn render_execute(
        &self,
        kind: FunctionKind,
        name: &str,
        sql: &str,
        doc: &str,
    ) -> Result<GeneratedFunction> {
        let ident = parse_ident(name)?;
        let slice = parse_ident(&self.names.slice)?;
        let record = &self.record;

        let tokens = quote! {
            #[doc = #doc]
            pub async fn #ident<'e, E>(
                executor: E,
                record: &#record,
            ) -> ::std::result::Result<::sqlx::postgres::PgQueryResult, ::sqlx::Error>
            where
                E: ::sqlx::PgExecutor<'e>,
            {
                let args = #slice(record)?;
                ::sqlx::query_with(#sql, args).execute(executor).await
            }
        };

        Ok(self.function(kind, name, tokens))
    }

    // Callers check that fields is non-empty before rendering helpers.
    fn identity(&self) -> &FieldContext {
        &self.fields[0]
    }

    fn column_list(&self) -> String {
        self.fields
            .iter()
            .map(|field| format!("\"{}\"", field.column))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn function(&self, kind: FunctionKind, name: &str, tokens: TokenStream) -> GeneratedFunction {
        GeneratedFunction {
            name: name.to_string(),
            kind,
            tokens,
        }
    }
}

pub(crate) fn parse_ident(name: &str) -> Result<Ident> {
    syn::parse_str::<Ident>(name)
        .map_err(|_| Error::input(format!("`{name}` is not a valid identifier")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::FieldDescriptor;

    fn post() -> RecordDescriptor {
        RecordDescriptor::new(
            "Post",
            vec![
                FieldDescriptor::new("id", "i64", false),
                FieldDescriptor::new("title", "String", false),
                FieldDescriptor::new("tags", "Vec<String>", true),
            ],
        )
    }

    #[test]
    fn test_kinds_in_order() {
        let ctx = RecordContext::new(&post(), true).unwrap();
        let kinds: Vec<_> = ctx.render(true).unwrap().iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            [
                FunctionKind::Scan,
                FunctionKind::ScanPlural,
                FunctionKind::Select,
                FunctionKind::SelectPlural,
                FunctionKind::Slice,
                FunctionKind::Insert,
                FunctionKind::Update,
            ]
        );
    }

    #[test]
    fn test_scan_binds_by_position() {
        let ctx = RecordContext::new(&post(), false).unwrap();
        let scan = ctx.render_scan().unwrap();
        let item: syn::ItemFn = syn::parse2(scan.tokens).unwrap();
        assert_eq!(item.sig.ident, "ScanPost");
        assert!(matches!(item.vis, syn::Visibility::Public(_)));

        let body = quote!(#item).to_string();
        let id = body.find("0usize").unwrap();
        let title = body.find("1usize").unwrap();
        let tags = body.find("2usize").unwrap();
        assert!(id < title && title < tags);
    }

    #[test]
    fn test_unexported_scan_is_restricted() {
        let ctx = RecordContext::new(&post(), true).unwrap();
        let item: syn::ItemFn = syn::parse2(ctx.render_scan().unwrap().tokens).unwrap();
        assert_eq!(item.sig.ident, "scanPost");
        assert!(matches!(item.vis, syn::Visibility::Restricted(_)));
    }

    #[test]
    fn test_sql_statements() {
        let ctx = RecordContext::new(&post(), true).unwrap();
        let functions = ctx.render(true).unwrap();
        let text = |kind: FunctionKind| {
            let f = functions.iter().find(|f| f.kind == kind).unwrap();
            f.tokens.to_string()
        };

        let select = r#"SELECT \"id\", \"title\", \"tags\" FROM \"post\" WHERE \"id\" = $1"#;
        let insert = r#"INSERT INTO \"post\" (\"id\", \"title\", \"tags\") VALUES ($1, $2, $3)"#;
        let update = r#"UPDATE \"post\" SET \"title\" = $2, \"tags\" = $3 WHERE \"id\" = $1"#;
        assert!(text(FunctionKind::Select).contains(select));
        assert!(text(FunctionKind::Insert).contains(insert));
        assert!(text(FunctionKind::Update).contains(update));
    }

    #[test]
    fn test_helpers_need_identity() {
        let empty = RecordDescriptor::new("Empty", vec![]);
        let ctx = RecordContext::new(&empty, true).unwrap();
        assert_eq!(ctx.render(false).unwrap().len(), 2);
        assert!(matches!(ctx.render(true), Err(Error::Input { .. })));
    }

    #[test]
    fn test_invalid_names_rejected() {
        let bad = RecordDescriptor::new("not valid", vec![]);
        assert!(matches!(RecordContext::new(&bad, true), Err(Error::Input { .. })));

        let bad_type = RecordDescriptor::new("Ok", vec![FieldDescriptor::new("a", "Vec<", false)]);
        assert!(matches!(RecordContext::new(&bad_type, true), Err(Error::Input { .. })));
    }
}
