mod fixture;
mod model_manager_test;
