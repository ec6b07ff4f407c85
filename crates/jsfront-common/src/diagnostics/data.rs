//! Diagnostic message table.
//!
//! Each entry defines a code constant in [`diagnostic_codes`], its template in
//! [`diagnostic_messages`], and a row in [`DIAGNOSTIC_MESSAGES`]. Templates use
//! `{0}`, `{1}`, ... placeholders filled by `format_message`.

use super::{DiagnosticCategory, DiagnosticMessage};

macro_rules! define_diagnostics {
    ($($name:ident = $code:literal, $category:ident, $message:literal;)*) => {
        pub mod diagnostic_codes {
            $(pub const $name: u32 = $code;)*
        }

        pub mod diagnostic_messages {
            $(pub const $name: &str = $message;)*
        }

        pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
            $(DiagnosticMessage {
                code: $code,
                category: DiagnosticCategory::$category,
                message: $message,
            },)*
        ];
    };
}

define_diagnostics! {
    // Lexical errors
    UNEXPECTED_TOKEN = 1001, Error, "expected {0}, got {1}";
    ILLEGAL_CHARACTER = 1002, Error, "illegal character";
    UNTERMINATED_STRING = 1003, Error, "unterminated string literal";
    UNTERMINATED_TEMPLATE = 1004, Error, "unterminated template literal";
    UNTERMINATED_COMMENT = 1005, Error, "unterminated comment";
    UNTERMINATED_REGEXP = 1006, Error, "unterminated regular expression literal";
    BAD_REGEXP_FLAG = 1007, Error, "invalid regular expression flag {0}";
    IDENTIFIER_AFTER_NUMBER = 1008, Error, "identifier starts immediately after numeric literal";
    MALFORMED_ESCAPE = 1009, Error, "malformed {0} character escape sequence";
    NUMERIC_SEPARATOR = 1010, Error, "numeric separators are not allowed here";
    MISSING_DIGITS = 1011, Error, "missing digits after {0}";
    BAD_ESCAPED_KEYWORD = 1012, Error, "keywords must be written literally, without embedded escapes";
    UNEXPECTED_TOKEN_NO_EXPECT = 1013, Error, "unexpected token: {0}";
    SEMI_BEFORE_STMNT = 1014, Error, "missing ; before statement";
    BAD_PROP_ID = 1015, Error, "invalid property id";
    COLON_AFTER_ID = 1016, Error, "missing : after property id";
    MALFORMED_TEMPLATE_ESCAPE = 1017, Error, "malformed escape sequence in template literal";

    // Early (static semantic) errors
    REDECLARED_VAR = 1100, Error, "redeclaration of {0} {1}";
    PREV_DECLARATION = 1101, Error, "Previously declared at line {0}, column {1}";
    BAD_DUP_ARGS = 1102, Error, "duplicate argument names not allowed in this context";
    BAD_LEFTSIDE_OF_ASS = 1103, Error, "invalid assignment left-hand side";
    BAD_INCOP_OPERAND = 1104, Error, "invalid increment/decrement operand";
    BAD_DESTRUCT_TARGET = 1105, Error, "invalid destructuring target";
    BAD_DESTRUCT_PARENS = 1106, Error, "destructuring patterns in assignments can't be parenthesized";
    BAD_BREAK = 1107, Error, "unlabeled break must be inside loop or switch";
    BAD_CONTINUE = 1108, Error, "continue must be inside loop";
    LABEL_NOT_FOUND = 1109, Error, "label not found";
    DUPLICATE_LABEL = 1110, Error, "duplicate label";
    BAD_RETURN = 1111, Error, "return not in function";
    RESERVED_ID = 1112, Error, "{0} is a reserved identifier";
    BAD_STRICT_ASSIGN = 1113, Error, "'{0}' can't be defined or assigned to in strict mode code";
    DEPRECATED_OCTAL = 1114, Error, "octal literals and octal escape sequences are deprecated";
    DEPRECATED_DELETE_OPERAND = 1115, Error, "applying the 'delete' operator to an unqualified name is deprecated";
    STRICT_CODE_WITH = 1116, Error, "strict mode code may not contain 'with' statements";
    STRICT_NON_SIMPLE_PARAMS = 1117, Error, "\"use strict\" not allowed in function with {0} parameter";
    STRICT_FUNCTION_STATEMENT = 1118, Error, "in strict mode code, functions may be declared only at top level or inside a block";
    LEXICAL_DECL_NOT_IN_BLOCK = 1119, Error, "{0} declaration not directly within block";
    LEXICAL_DECL_DEFINES_LET = 1120, Error, "a lexical declaration can't define a 'let' binding";
    LET_STARTING_FOROF = 1121, Error, "an expression X in 'for (X of Y)' must not start with 'let'";
    BAD_CONST_DECL = 1122, Error, "missing = in const declaration";
    BAD_DESTRUCT_DECL = 1123, Error, "missing = in destructuring declaration";
    BAD_FOR_LEFTSIDE = 1124, Error, "invalid for-in/of left-hand side";
    FOR_IN_DECL_INIT = 1125, Error, "for-{0} loop head declarations may not have initializers";
    FOR_AWAIT_NOT_OF = 1126, Error, "for await (... in ...) is not valid";
    BAD_COALESCE_MIXING = 1127, Error, "cannot use `??` unparenthesized within `||` and `&&` expressions";
    BAD_POW_LEFTSIDE = 1128, Error, "unparenthesized unary expression can't appear on the left-hand side of '**'";
    BAD_OPTIONAL_TEMPLATE = 1129, Error, "tagged template cannot be used in optional chain";
    BAD_NEW_OPTIONAL = 1130, Error, "new keyword cannot be used with an optional chain";
    BAD_ARROW_ARGS = 1131, Error, "invalid arrow-function arguments (parentheses around the arrow-function may help)";
    LINE_BREAK_BEFORE_ARROW = 1132, Error, "no line break is allowed before '=>'";
    YIELD_IN_PARAMETER = 1133, Error, "yield expression can't be used in parameter";
    AWAIT_IN_PARAMETER = 1134, Error, "await expression can't be used in parameter";
    AWAIT_OUTSIDE_ASYNC = 1135, Error, "await is only valid in async functions and the top level bodies of modules";
    BAD_SUPERPROP = 1136, Error, "use of super property accesses only valid within methods or eval code within methods";
    BAD_SUPERCALL = 1137, Error, "super() is only valid in derived class constructors";
    BAD_NEWTARGET = 1138, Error, "new.target only allowed within functions";
    BAD_IMPORT_META = 1139, Error, "import.meta may only appear in a module";
    IMPORT_DECL_AT_TOP_LEVEL = 1140, Error, "import declarations may only appear at top level of a module";
    EXPORT_DECL_AT_TOP_LEVEL = 1141, Error, "export declarations may only appear at top level of a module";
    DUPLICATE_EXPORT_NAME = 1142, Error, "duplicate export name '{0}'";
    MISSING_EXPORT_BINDING = 1143, Error, "local binding for export '{0}' not found";
    DUPLICATE_PROTO_PROPERTY = 1144, Error, "property name __proto__ appears more than once in object literal";
    BAD_GETTER_ARITY = 1145, Error, "getter functions must have no arguments";
    BAD_SETTER_ARITY = 1146, Error, "setter functions must have one argument";
    ACCESSOR_REST = 1147, Error, "setter function argument must not be a rest parameter";
    DUPLICATE_CONSTRUCTOR = 1148, Error, "class can't have more than one constructor";
    BAD_METHOD_DEF = 1149, Error, "{0} can't be a special method";
    CLASS_STATIC_PROTOTYPE = 1150, Error, "classes may not have a static property named 'prototype'";
    UNDECLARED_PRIVATE = 1151, Error, "reference to undeclared private field or method {0}";
    DUPLICATE_PRIVATE = 1152, Error, "private name {0} declared more than once";
    PRIVATE_DELETE = 1153, Error, "private fields can't be deleted";
    BAD_ARGUMENTS_IN_INITIALIZER = 1154, Error, "'arguments' is not allowed in class field initializer or static initialization block";
    REST_WITH_DEFAULT = 1155, Error, "rest parameter may not have a default";
    PARAMETER_AFTER_REST = 1156, Error, "parameter after rest parameter";
    FUNCTION_LABEL = 1157, Error, "{0} declarations cannot be labelled";
    UNNAMED_FUNCTION_STMT = 1158, Error, "function statement requires a name";
    UNNAMED_CLASS_STMT = 1159, Error, "class statement requires a name";
    COMPREHENSIONS_DISABLED = 1160, Error, "legacy comprehensions are not enabled";
    MISSING_FORMAL = 1161, Error, "missing formal parameter";
    AS_AFTER_RESERVED_WORD = 1162, Error, "missing 'as' after reserved word '{0}'";
    NEWLINE_AFTER_THROW = 1163, Error, "no line break is allowed between 'throw' and its expression";
    TOO_MANY_DEFAULTS = 1164, Error, "more than one switch default";
    CATCH_OR_FINALLY = 1165, Error, "missing catch or finally after try";
    BAD_SHORTHAND_INIT = 1166, Error, "invalid shorthand property initializer";
    BAD_CONTINUE_LABEL = 1167, Error, "label '{0}' does not denote a loop";
    BAD_GENEXP_BODY = 1168, Error, "{0} expression must be parenthesized";
    BAD_REST_TARGET = 1169, Error, "rest element may not have a trailing comma or initializer";
    BAD_IMPORT_CALL = 1170, Error, "import() requires exactly one argument";
    SELFHOSTED_METHOD_CALL = 1171, Error, "self-hosted code may not contain direct method calls";
    BAD_CLASS_MEMBER = 1172, Error, "invalid class member";
    SELFHOSTED_TOP_LEVEL_LEXICAL = 1173, Error, "self-hosted code cannot contain top-level {0} declarations";

    // Warnings
    USE_ASM_TYPE_FAIL = 1200, Warning, "asm.js type error: {0}";
    USE_ASM_DIRECTIVE_FAIL = 1201, Warning, "\"use asm\" is only meaningful in the Directive Prologue of a function body";
    SOURCE_MAP_URL_OVERRIDE = 1202, Warning, "source map url '{0}' from the sourceMappingURL comment is overridden by the parse options";
    EQUAL_AS_ASSIGN = 1210, ExtraWarning, "test for equality (==) mistyped as assignment (=)?";
    STMT_AFTER_RETURN = 1211, ExtraWarning, "unreachable code after return statement";
    USELESS_EXPR = 1212, ExtraWarning, "useless expression";

    // Internal / resource errors
    OVER_RECURSED = 1300, Error, "too much recursion";
    OUT_OF_MEMORY = 1301, Error, "out of memory";
}
