//! Declarative filter tables.

/// Build a [`FilterPipeline`](crate::FilterPipeline) from a filter table.
///
/// Each entry is `stage "name" => filter`, optionally followed by
/// `only: [routes]` and/or `except: [routes]`, and ends with `;`. Stages are
/// `before`, `around` and `after`; entries keep their order within a stage.
///
/// # Example
///
/// ```rust
/// use switchyard::{LoggingFilter, Params, Stage, filters};
///
/// let pipeline = filters! {
///     before "auth" => |_: &str, params: &Params| params.contains_key("token"),
///         except: ["login"];
///     around "log" => LoggingFilter, only: ["search", "users"];
///     after "track" => |route: &str, _: &Params| println!("visited {route}");
/// };
///
/// assert_eq!(pipeline.filters_for(Stage::Before, "login"), Vec::<&str>::new());
/// assert_eq!(pipeline.filters_for(Stage::Around, "search"), vec!["log"]);
/// ```
#[macro_export]
macro_rules! filters {
    (@push $pipeline:expr, before, $name:expr, $filter:expr, $scope:expr) => {
        $pipeline.before_scoped($name, $filter, $scope)
    };
    (@push $pipeline:expr, around, $name:expr, $filter:expr, $scope:expr) => {
        $pipeline.around_scoped($name, $filter, $scope)
    };
    (@push $pipeline:expr, after, $name:expr, $filter:expr, $scope:expr) => {
        $pipeline.after_scoped($name, $filter, $scope)
    };
    ($(
        $stage:ident $name:literal => $filter:expr
        $(, only: [$($only:expr),+ $(,)?])?
        $(, except: [$($except:expr),+ $(,)?])?
    );* $(;)?) => {{
        let pipeline = $crate::FilterPipeline::new();
        $(
            let pipeline = $crate::filters!(
                @push pipeline,
                $stage,
                $name,
                $filter,
                $crate::FilterScope::all()
                    $(.only([$($only),+]))?
                    $(.except([$($except),+]))?
            );
        )*
        pipeline
    }};
}
