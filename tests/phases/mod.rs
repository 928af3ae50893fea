mod full_run;
mod post_ponr_failures;
