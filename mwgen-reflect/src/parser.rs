//! Declaration-level parser for Go source files.
//!
//! Only the package clause, imports and type declarations are understood.
//! Function, variable and constant declarations are skipped by scanning
//! balanced delimiters, which is all a signature reflector needs.

use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::trace;

use crate::{
    descriptor::{ImportSpec, MethodDescriptor, Param, SourceFile, TypeDecl, TypeDeclKind},
    error::{Result, SourceContext},
    lexer::{Span, Spanned, Token, tokenize},
    types::{ChanDir, FuncField, InterfaceElem, StructField, TypeExpr, UnionTerm},
};

impl SourceFile {
    /// Parse one Go source file.
    pub fn parse(path: impl Into<PathBuf>, source: String) -> Result<Self> {
        let path = path.into();
        let (package, imports, types) = {
            let ctx = SourceContext::new(&source, path.display().to_string());
            Parser::new(ctx)?.parse_file()?
        };
        Ok(Self {
            path,
            source,
            package,
            imports,
            types,
        })
    }
}

/// Parse a standalone type expression, e.g. `map[string][]*pkg.Item`.
pub fn parse_type(src: &str) -> Result<TypeExpr> {
    let mut parser = Parser::new(SourceContext::new(src, "<type>"))?;
    let ty = parser.parse_type()?;
    parser.eat(Token::Semicolon);
    if let Some(tok) = parser.tokens.get(parser.pos) {
        return Err(parser
            .ctx
            .syntax_error("end of type", tok.describe(), tok.span.clone()));
    }
    Ok(ty)
}

type FileContents = (String, Vec<ImportSpec>, Vec<TypeDecl>);

struct Parser<'a> {
    ctx: SourceContext<'a>,
    tokens: Vec<Spanned>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(ctx: SourceContext<'a>) -> Result<Self> {
        let tokens = tokenize(ctx.src()).map_err(|e| ctx.lex_error(e.message, e.span))?;
        Ok(Self {
            ctx,
            tokens,
            pos: 0,
        })
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    fn peek(&self) -> Option<Token> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<Token> {
        self.tokens.get(self.pos + offset).map(|t| t.token)
    }

    fn at(&self, token: Token) -> bool {
        self.peek() == Some(token)
    }

    fn bump(&mut self) -> Span {
        let span = self
            .tokens
            .get(self.pos)
            .map(|t| t.span.clone())
            .unwrap_or_else(|| self.eof_span());
        self.pos += 1;
        span
    }

    fn eat(&mut self, token: Token) -> bool {
        if self.at(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn text(&self, span: &Span) -> &'a str {
        &self.ctx.src()[span.clone()]
    }

    fn eof_span(&self) -> Span {
        let len = self.ctx.src().len();
        len..len
    }

    fn error(&self, expected: &str) -> Box<crate::Error> {
        match self.tokens.get(self.pos) {
            Some(tok) => self
                .ctx
                .syntax_error(expected, tok.describe(), tok.span.clone()),
            None => self
                .ctx
                .syntax_error(expected, "end of file", self.eof_span()),
        }
    }

    fn expect(&mut self, token: Token, expected: &str) -> Result<Span> {
        if self.at(token) {
            Ok(self.bump())
        } else {
            Err(self.error(expected))
        }
    }

    fn expect_ident(&mut self, expected: &str) -> Result<(String, Span)> {
        let span = self.expect(Token::Ident, expected)?;
        Ok((self.text(&span).to_string(), span))
    }

    /// A declaration ends with `;`, or right before a closing `)`/`}`.
    fn expect_terminator(&mut self) -> Result<()> {
        match self.peek() {
            Some(Token::Semicolon) => {
                self.pos += 1;
                Ok(())
            }
            Some(Token::RParen) | Some(Token::RBrace) | None => Ok(()),
            Some(_) => Err(self.error("';' or newline")),
        }
    }

    /// Advance to the next `;` or unmatched closing delimiter at depth 0,
    /// without consuming it.
    fn skip_to_terminator(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            match token {
                Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
                Token::RParen | Token::RBracket | Token::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                Token::Semicolon if depth == 0 => return,
                _ => {}
            }
            self.pos += 1;
        }
    }

    /// Consume a balanced group starting at an opening delimiter and return
    /// the spans of the tokens strictly inside it.
    fn skip_group(&mut self) -> Result<Vec<Spanned>> {
        let open = self.bump();
        let mut depth = 1usize;
        let mut inner = Vec::new();
        while let Some(tok) = self.tokens.get(self.pos).cloned() {
            match tok.token {
                Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
                Token::RParen | Token::RBracket | Token::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        return Ok(inner);
                    }
                }
                _ => {}
            }
            inner.push(tok);
            self.pos += 1;
        }
        Err(self
            .ctx
            .syntax_error("closing delimiter", "end of file", open))
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_file(mut self) -> Result<FileContents> {
        while self.eat(Token::Semicolon) {}
        self.expect(Token::Package, "package clause")?;
        let (package, _) = self.expect_ident("package name")?;
        self.expect_terminator()?;

        let mut imports = Vec::new();
        let mut types = Vec::new();

        while let Some(token) = self.peek() {
            match token {
                Token::Semicolon => self.pos += 1,
                Token::Import => self.parse_import_decl(&mut imports)?,
                Token::Type => self.parse_type_decl(&mut types)?,
                Token::Func | Token::Var | Token::Const => {
                    self.skip_to_terminator();
                    if !self.eat(Token::Semicolon) && self.peek().is_some() {
                        return Err(self.error("declaration"));
                    }
                }
                _ => return Err(self.error("declaration")),
            }
        }

        trace!(
            package = %package,
            imports = imports.len(),
            types = types.len(),
            "parsed file"
        );
        Ok((package, imports, types))
    }

    fn parse_import_decl(&mut self, imports: &mut Vec<ImportSpec>) -> Result<()> {
        self.bump();
        if self.eat(Token::LParen) {
            loop {
                while self.eat(Token::Semicolon) {}
                if self.eat(Token::RParen) {
                    break;
                }
                imports.push(self.parse_import_spec()?);
                self.expect_terminator()?;
            }
        } else {
            imports.push(self.parse_import_spec()?);
        }
        self.expect_terminator()
    }

    fn parse_import_spec(&mut self) -> Result<ImportSpec> {
        let alias = match self.peek() {
            Some(Token::Ident) => Some(self.expect_ident("import name")?.0),
            Some(Token::Dot) => {
                self.bump();
                Some(".".to_string())
            }
            _ => None,
        };
        let span = self.expect(Token::String, "import path")?;
        let quoted = self.text(&span);
        let path = quoted[1..quoted.len() - 1].to_string();
        Ok(ImportSpec { alias, path })
    }

    fn parse_type_decl(&mut self, types: &mut Vec<TypeDecl>) -> Result<()> {
        self.bump();
        if self.eat(Token::LParen) {
            loop {
                while self.eat(Token::Semicolon) {}
                if self.eat(Token::RParen) {
                    break;
                }
                types.push(self.parse_type_spec()?);
                self.expect_terminator()?;
            }
        } else {
            types.push(self.parse_type_spec()?);
        }
        self.expect_terminator()
    }

    fn parse_type_spec(&mut self) -> Result<TypeDecl> {
        let (name, span) = self.expect_ident("type name")?;

        let generic = self.at(Token::LBracket) && self.at_type_params();
        if generic {
            self.skip_group()?;
        }
        self.eat(Token::Assign);

        let kind = if self.at(Token::Interface) {
            let (methods, embedded) = self.parse_interface_body()?;
            TypeDeclKind::Interface { methods, embedded }
        } else {
            self.skip_to_terminator();
            TypeDeclKind::Other
        };

        Ok(TypeDecl {
            name,
            span,
            generic,
            kind,
        })
    }

    /// Distinguish `type T[P any] ...` from an array type `type T [N]E`.
    fn at_type_params(&self) -> bool {
        self.peek_at(1) == Some(Token::Ident)
            && matches!(
                self.peek_at(2),
                Some(
                    Token::Ident
                        | Token::Comma
                        | Token::Tilde
                        | Token::Star
                        | Token::LBracket
                        | Token::Interface
                        | Token::Func
                        | Token::Map
                        | Token::Chan
                        | Token::Struct
                )
            )
    }

    fn parse_interface_body(&mut self) -> Result<(Vec<MethodDescriptor>, Vec<String>)> {
        self.expect(Token::Interface, "interface")?;
        self.expect(Token::LBrace, "'{'")?;

        let mut methods: Vec<MethodDescriptor> = Vec::new();
        let mut seen: IndexMap<String, Span> = IndexMap::new();
        let mut embedded = Vec::new();

        loop {
            while self.eat(Token::Semicolon) {}
            if self.eat(Token::RBrace) {
                break;
            }
            if self.peek().is_none() {
                return Err(self.error("'}'"));
            }

            if self.at(Token::Ident) && self.peek_at(1) == Some(Token::LParen) {
                let method = self.parse_method()?;
                if let Some(first) = seen.get(&method.name) {
                    return Err(self.ctx.duplicate_method_error(
                        &method.name,
                        first.clone(),
                        method.span.clone(),
                    ));
                }
                seen.insert(method.name.clone(), method.span.clone());
                methods.push(method);
            } else {
                let start = self.pos;
                self.skip_to_terminator();
                embedded.push(self.join_tokens(&self.tokens[start..self.pos]));
            }
            if !self.at(Token::RBrace) {
                self.expect(Token::Semicolon, "';' or newline")?;
            }
        }

        Ok((methods, embedded))
    }

    fn parse_method(&mut self) -> Result<MethodDescriptor> {
        let (name, name_span) = self.expect_ident("method name")?;
        let params = self
            .parse_parameters()?
            .into_iter()
            .enumerate()
            .map(|(i, field)| {
                let name = match field.name {
                    Some(name) if name != "_" => name,
                    _ => format!("arg{}", i),
                };
                Param::new(name, field.ty)
            })
            .collect();
        let returns = self
            .parse_results()?
            .into_iter()
            .map(|field| field.ty)
            .collect();
        let end = self.tokens[self.pos - 1].span.end;

        Ok(MethodDescriptor {
            name,
            params,
            returns,
            span: name_span.start..end,
        })
    }

    // =========================================================================
    // Signatures
    // =========================================================================

    /// Parse `(a, b int, c ...string)` into one field per parameter.
    fn parse_parameters(&mut self) -> Result<Vec<FuncField>> {
        self.expect(Token::LParen, "'('")?;

        let mut entries: Vec<(Option<String>, TypeExpr, Span)> = Vec::new();
        loop {
            if self.eat(Token::RParen) {
                break;
            }
            let start = self.tokens.get(self.pos).map(|t| t.span.start);
            let entry = if self.at(Token::Ident) && self.starts_type_after_name() {
                let (name, _) = self.expect_ident("parameter name")?;
                (Some(name), self.parse_param_type()?)
            } else {
                (None, self.parse_param_type()?)
            };
            let end = self.tokens[self.pos - 1].span.end;
            entries.push((entry.0, entry.1, start.unwrap_or(end)..end));

            if !self.eat(Token::Comma) {
                self.expect(Token::RParen, "',' or ')'")?;
                break;
            }
        }

        if entries.iter().all(|(name, _, _)| name.is_none()) {
            return Ok(entries
                .into_iter()
                .map(|(_, ty, _)| FuncField { name: None, ty })
                .collect());
        }

        // In a named list, a bare identifier is a name sharing the type of
        // the next named entry: `(a, b int)`.
        let mut fields = Vec::with_capacity(entries.len());
        let mut shared: Option<TypeExpr> = None;
        for (name, ty, span) in entries.into_iter().rev() {
            match name {
                Some(name) => {
                    shared = Some(ty.clone());
                    fields.push(FuncField {
                        name: Some(name),
                        ty,
                    });
                }
                None => {
                    let name = match (&ty, &shared) {
                        (
                            TypeExpr::Named {
                                package: None,
                                name,
                                args,
                            },
                            Some(_),
                        ) if args.is_empty() => name.clone(),
                        _ => {
                            return Err(self.ctx.syntax_error(
                                "parameter name",
                                "mixed named and unnamed parameters",
                                span,
                            ));
                        }
                    };
                    fields.push(FuncField {
                        name: Some(name),
                        ty: shared.clone().unwrap_or(ty),
                    });
                }
            }
        }
        fields.reverse();
        Ok(fields)
    }

    /// Whether the identifier under the cursor is a parameter name, i.e. is
    /// followed by the start of a type rather than `.`, `,` or `)`.
    ///
    /// After `[` the bracket is matched first: `a []T` and `a [4]T` are
    /// named, while `Page[Item]` followed by `,` or `)` is an instantiated
    /// type.
    fn starts_type_after_name(&self) -> bool {
        match self.peek_at(1) {
            Some(Token::LBracket) => {
                let mut depth = 0usize;
                let mut offset = 1;
                while let Some(token) = self.peek_at(offset) {
                    match token {
                        Token::LBracket => depth += 1,
                        Token::RBracket => {
                            depth -= 1;
                            if depth == 0 {
                                return self
                                    .peek_at(offset + 1)
                                    .is_some_and(|t| t == Token::Ellipsis || starts_type(t));
                            }
                        }
                        _ => {}
                    }
                    offset += 1;
                }
                false
            }
            Some(t) => t == Token::Ellipsis || starts_type(t),
            None => false,
        }
    }

    fn parse_param_type(&mut self) -> Result<TypeExpr> {
        if self.eat(Token::Ellipsis) {
            Ok(TypeExpr::Variadic(Box::new(self.parse_type()?)))
        } else {
            self.parse_type()
        }
    }

    fn parse_results(&mut self) -> Result<Vec<FuncField>> {
        match self.peek() {
            Some(Token::LParen) => self.parse_parameters(),
            Some(token) if starts_type(token) => Ok(vec![FuncField {
                name: None,
                ty: self.parse_type()?,
            }]),
            _ => Ok(Vec::new()),
        }
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn parse_type(&mut self) -> Result<TypeExpr> {
        match self.peek() {
            Some(Token::Ident) => {
                let (first, _) = self.expect_ident("type name")?;
                let (package, name) = if self.eat(Token::Dot) {
                    let (name, _) = self.expect_ident("type name")?;
                    (Some(first), name)
                } else {
                    (None, first)
                };
                let mut args = Vec::new();
                if self.eat(Token::LBracket) {
                    loop {
                        args.push(self.parse_type()?);
                        if !self.eat(Token::Comma) || self.at(Token::RBracket) {
                            break;
                        }
                    }
                    self.expect(Token::RBracket, "']'")?;
                }
                Ok(TypeExpr::Named {
                    package,
                    name,
                    args,
                })
            }
            Some(Token::Star) => {
                self.bump();
                Ok(TypeExpr::Pointer(Box::new(self.parse_type()?)))
            }
            Some(Token::LBracket) => {
                if self.peek_at(1) == Some(Token::RBracket) {
                    self.pos += 2;
                    return Ok(TypeExpr::Slice(Box::new(self.parse_type()?)));
                }
                let inner = self.skip_group()?;
                let len = self.join_tokens(&inner);
                Ok(TypeExpr::Array {
                    len,
                    elem: Box::new(self.parse_type()?),
                })
            }
            Some(Token::Map) => {
                self.bump();
                self.expect(Token::LBracket, "'['")?;
                let key = self.parse_type()?;
                self.expect(Token::RBracket, "']'")?;
                Ok(TypeExpr::Map {
                    key: Box::new(key),
                    value: Box::new(self.parse_type()?),
                })
            }
            Some(Token::Chan) => {
                self.bump();
                let dir = if self.eat(Token::Arrow) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                Ok(TypeExpr::Chan {
                    dir,
                    elem: Box::new(self.parse_type()?),
                })
            }
            Some(Token::Arrow) => {
                self.bump();
                self.expect(Token::Chan, "'chan'")?;
                Ok(TypeExpr::Chan {
                    dir: ChanDir::Recv,
                    elem: Box::new(self.parse_type()?),
                })
            }
            Some(Token::Func) => {
                self.bump();
                let params = self.parse_parameters()?;
                let results = self.parse_results()?;
                Ok(TypeExpr::Func { params, results })
            }
            Some(Token::Struct) => {
                self.bump();
                Ok(TypeExpr::Struct(self.parse_struct_body()?))
            }
            Some(Token::Interface) => {
                self.bump();
                Ok(TypeExpr::Interface(self.parse_interface_literal()?))
            }
            Some(Token::LParen) => {
                self.bump();
                let inner = self.parse_type()?;
                self.expect(Token::RParen, "')'")?;
                Ok(TypeExpr::Paren(Box::new(inner)))
            }
            _ => Err(self.error("type")),
        }
    }

    /// Fields of `struct{...}`, starting at the `{`.
    fn parse_struct_body(&mut self) -> Result<Vec<StructField>> {
        self.expect(Token::LBrace, "'{'")?;
        let mut fields = Vec::new();
        loop {
            while self.eat(Token::Semicolon) {}
            if self.eat(Token::RBrace) {
                break;
            }

            let mut names = Vec::new();
            if self.at(Token::Ident)
                && (self.peek_at(1) == Some(Token::Comma) || self.starts_type_after_name())
            {
                loop {
                    let (name, _) = self.expect_ident("field name")?;
                    names.push(name);
                    if !self.eat(Token::Comma) {
                        break;
                    }
                }
            }
            let ty = self.parse_type()?;
            let tag = if self.at(Token::String) {
                let span = self.bump();
                Some(self.text(&span).to_string())
            } else {
                None
            };
            fields.push(StructField { names, ty, tag });

            if !self.at(Token::RBrace) {
                self.expect(Token::Semicolon, "';' or '}'")?;
            }
        }
        Ok(fields)
    }

    /// Elements of an inline `interface{...}`, starting at the `{`.
    fn parse_interface_literal(&mut self) -> Result<Vec<InterfaceElem>> {
        self.expect(Token::LBrace, "'{'")?;
        let mut elems = Vec::new();
        loop {
            while self.eat(Token::Semicolon) {}
            if self.eat(Token::RBrace) {
                break;
            }

            if self.at(Token::Ident) && self.peek_at(1) == Some(Token::LParen) {
                let (name, _) = self.expect_ident("method name")?;
                let params = self.parse_parameters()?;
                let results = self.parse_results()?;
                elems.push(InterfaceElem::Method {
                    name,
                    params,
                    results,
                });
            } else {
                let mut terms = Vec::new();
                loop {
                    let tilde = self.eat(Token::Tilde);
                    terms.push(UnionTerm {
                        tilde,
                        ty: self.parse_type()?,
                    });
                    if !self.eat(Token::Pipe) {
                        break;
                    }
                }
                elems.push(InterfaceElem::Union(terms));
            }

            if !self.at(Token::RBrace) {
                self.expect(Token::Semicolon, "';' or '}'")?;
            }
        }
        Ok(elems)
    }

    /// Re-render a token run as compact single-line source.
    fn join_tokens(&self, tokens: &[Spanned]) -> String {
        let mut out = String::new();
        let mut prev: Option<Token> = None;
        for tok in tokens {
            let text = if tok.is_implicit() {
                ";"
            } else {
                self.text(&tok.span)
            };
            let glue_after = matches!(
                prev,
                None | Some(
                    Token::LParen
                        | Token::LBracket
                        | Token::RBracket
                        | Token::Dot
                        | Token::Star
                        | Token::Ellipsis
                        | Token::Tilde
                        | Token::Arrow
                )
            );
            let glue_before = matches!(
                tok.token,
                Token::RParen
                    | Token::RBracket
                    | Token::LParen
                    | Token::Comma
                    | Token::Semicolon
                    | Token::Dot
            ) || (tok.token == Token::LBracket && prev == Some(Token::Map));
            if !glue_after && !glue_before {
                out.push(' ');
            }
            out.push_str(text);
            prev = Some(tok.token);
        }
        out
    }
}

/// Tokens that can begin a type (excluding `(`).
fn starts_type(token: Token) -> bool {
    matches!(
        token,
        Token::Ident
            | Token::Star
            | Token::LBracket
            | Token::Map
            | Token::Chan
            | Token::Func
            | Token::Interface
            | Token::Struct
            | Token::Arrow
    )
}
